use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Snapshot taken after each rendered frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTick {
    /// Zero-based index of the frame within this worker's lifetime.
    pub index: u64,

    /// Time since the previous tick.
    pub dt: Duration,
}

/// Frame counter and fixed-interval sleeper for one render worker.
///
/// The interval is slept after every frame regardless of how long the frame
/// took. The sleep is cut short when the worker's running flag is cleared
/// and its thread unparked.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    started: Instant,
    last: Instant,
    frames: u64,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            started: now,
            last: now,
            frames: 0,
        }
    }

    /// Records one rendered frame.
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let tick = FrameTick {
            index: self.frames,
            dt: now.saturating_duration_since(self.last),
        };
        self.last = now;
        self.frames = self.frames.wrapping_add(1);
        tick
    }

    /// Sleeps one interval, returning early once `running` is cleared.
    pub fn wait(&self, running: &AtomicBool) {
        let deadline = Instant::now() + self.interval;
        loop {
            if !running.load(Ordering::Acquire) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            // Spurious wakeups just loop.
            thread::park_timeout(deadline - now);
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame rate since the worker started.
    pub fn average_fps(&self) -> f32 {
        let secs = self.last.saturating_duration_since(self.started).as_secs_f32();
        if secs <= f32::EPSILON {
            return 0.0;
        }
        self.frames as f32 / secs
    }
}
