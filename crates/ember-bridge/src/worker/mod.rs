//! Render worker.
//!
//! One background thread per bind cycle. It renders while its running flag is
//! set and the engine is ready, sleeping a fixed interval between frames.
//! Workers are never restarted: `stop_and_join` consumes them.

mod pacer;

pub use pacer::{FramePacer, FrameTick};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::config::BridgeConfig;
use crate::engine::{Engine, EngineBoundary, FrameStatus};
use crate::error::{BridgeError, Result};

/// Why a render worker left its loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WorkerExit {
    /// Running flag was cleared.
    Stopped,
    /// Engine readiness was cleared.
    NotReady,
    /// A frame returned an error.
    RenderFailed,
    /// A frame panicked.
    Panicked,
}

/// Handle to a live render thread.
pub struct RenderWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<WorkerExit>>,
    cycle: u64,
}

impl RenderWorker {
    /// Starts a worker for bind cycle `cycle`.
    pub fn spawn<E: Engine>(
        boundary: Arc<EngineBoundary<E>>,
        config: &BridgeConfig,
        cycle: u64,
    ) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let interval = config.frame_interval;
        let heartbeat = config.heartbeat_every;

        let handle = thread::Builder::new()
            .name(format!("{}-{cycle}", config.worker_name))
            .spawn(move || run(&boundary, &flag, interval, heartbeat, cycle))
            .map_err(BridgeError::WorkerSpawn)?;

        Ok(Self {
            running,
            handle: Some(handle),
            cycle,
        })
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Whether the worker has not been asked to stop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether the thread has left its loop (on its own or after a stop request).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Clears the running flag and wakes the thread if it is sleeping.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        if let Some(h) = &self.handle {
            h.thread().unpark();
        }
    }

    /// Stops the worker and blocks until its thread has exited.
    ///
    /// Bounded by one in-flight frame: the inter-frame sleep is interrupted.
    pub fn stop_and_join(mut self) -> WorkerExit {
        self.stop();
        self.join()
    }

    fn join(&mut self) -> WorkerExit {
        let Some(handle) = self.handle.take() else {
            return WorkerExit::Stopped;
        };
        match handle.join() {
            Ok(exit) => exit,
            Err(payload) => {
                log::error!(
                    "render worker {} died outside a frame: {}",
                    self.cycle,
                    panic_message(payload.as_ref())
                );
                WorkerExit::Panicked
            }
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
            self.join();
        }
    }
}

fn run<E: Engine>(
    boundary: &EngineBoundary<E>,
    running: &AtomicBool,
    interval: std::time::Duration,
    heartbeat: u64,
    cycle: u64,
) -> WorkerExit {
    log::info!("render worker {cycle} started ({} ms interval)", interval.as_millis());
    let mut pacer = FramePacer::new(interval);

    let exit = loop {
        if !running.load(Ordering::Acquire) {
            break WorkerExit::Stopped;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| boundary.render_frame())) {
            Ok(Ok(FrameStatus::Rendered)) => {
                let tick = pacer.tick();
                if heartbeat > 0 && tick.index % heartbeat == 0 {
                    log::info!(
                        "render worker {cycle}: frame {} ({:.1} fps, last frame {:.1} ms)",
                        tick.index,
                        pacer.average_fps(),
                        tick.dt.as_secs_f32() * 1000.0
                    );
                }
            }
            Ok(Ok(FrameStatus::NotReady)) => break WorkerExit::NotReady,
            Ok(Err(e)) => {
                log::error!("render worker {cycle}: {e}; rendering stops until the next surface change");
                break WorkerExit::RenderFailed;
            }
            Err(payload) => {
                log::error!(
                    "render worker {cycle}: frame panicked: {}; rendering stops until the next surface change",
                    panic_message(payload.as_ref())
                );
                break WorkerExit::Panicked;
            }
        }

        pacer.wait(running);
    };

    log::info!("render worker {cycle} stopped ({exit:?}) after {} frames", pacer.frames());
    exit
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::engine::SurfaceSize;
    use crate::testing::{NoAssets, RecordingEngine};

    fn ready_boundary(engine: RecordingEngine) -> Arc<EngineBoundary<RecordingEngine>> {
        let b = Arc::new(EngineBoundary::new(engine));
        b.init(NoAssets::shared(), SurfaceSize::new(64, 64)).unwrap();
        b.bind(Some(7)).unwrap();
        b.set_ready().unwrap();
        b
    }

    fn fast() -> BridgeConfig {
        BridgeConfig::default().with_frame_interval(Duration::from_millis(2))
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(1));
        }
    }

    // ── loop ──────────────────────────────────────────────────────────────

    #[test]
    fn renders_until_stopped() {
        let engine = RecordingEngine::new();
        let log = engine.log();
        let b = ready_boundary(engine);

        let w = RenderWorker::spawn(b.clone(), &fast(), 1).unwrap();
        wait_until(|| log.renders() >= 3);

        assert_eq!(w.stop_and_join(), WorkerExit::Stopped);
        let after = log.renders();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(log.renders(), after);
    }

    #[test]
    fn exits_when_readiness_cleared() {
        let engine = RecordingEngine::new();
        let log = engine.log();
        let b = ready_boundary(engine);

        let w = RenderWorker::spawn(b.clone(), &fast(), 1).unwrap();
        wait_until(|| log.renders() >= 1);
        b.set_not_ready();

        wait_until(|| w.is_finished());
        assert_eq!(w.stop_and_join(), WorkerExit::NotReady);
    }

    #[test]
    fn stop_interrupts_long_interval() {
        let engine = RecordingEngine::new();
        let log = engine.log();
        let b = ready_boundary(engine);
        let cfg = BridgeConfig::default().with_frame_interval(Duration::from_secs(30));

        let w = RenderWorker::spawn(b, &cfg, 1).unwrap();
        wait_until(|| log.renders() == 1);

        let t0 = Instant::now();
        w.stop_and_join();
        assert!(t0.elapsed() < Duration::from_secs(5));
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn render_error_ends_the_loop() {
        let engine = RecordingEngine::new().failing_render_at(2);
        let log = engine.log();
        let b = ready_boundary(engine);

        let w = RenderWorker::spawn(b.clone(), &fast(), 1).unwrap();
        wait_until(|| w.is_finished());

        assert_eq!(w.stop_and_join(), WorkerExit::RenderFailed);
        assert_eq!(log.renders(), 2);
        // Surface stays bound; only rendering stopped.
        assert!(b.surface_bound());
    }

    #[test]
    fn render_panic_is_contained() {
        let engine = RecordingEngine::new().panicking_render_at(1);
        let b = ready_boundary(engine);

        let w = RenderWorker::spawn(b.clone(), &fast(), 1).unwrap();
        wait_until(|| w.is_finished());

        assert_eq!(w.stop_and_join(), WorkerExit::Panicked);
        // Boundary lock was released by unwinding.
        assert!(b.set_not_ready());
    }

    #[test]
    fn thread_carries_cycle_name() {
        let engine = RecordingEngine::new();
        let b = ready_boundary(engine);
        let cfg = fast().with_worker_name("frames");

        let w = RenderWorker::spawn(b, &cfg, 4).unwrap();
        let name = w
            .handle
            .as_ref()
            .and_then(|h| h.thread().name().map(str::to_owned));
        assert_eq!(name.as_deref(), Some("frames-4"));
        assert_eq!(w.cycle(), 4);
        w.stop_and_join();
    }

    #[test]
    fn drop_joins_the_thread() {
        let engine = RecordingEngine::new();
        let log = engine.log();
        let b = ready_boundary(engine);

        let w = RenderWorker::spawn(b, &fast(), 1).unwrap();
        wait_until(|| log.renders() >= 1);
        drop(w);

        let after = log.renders();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(log.renders(), after);
    }
}
