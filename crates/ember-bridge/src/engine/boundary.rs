use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{BridgeError, Result};
use crate::input::InputEvent;

use super::contract::{AssetLoader, Engine, SurfaceSize};

/// Whether render and input calls may reach the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Readiness {
    NotReady,
    Ready,
}

/// Where the engine is in its own init/shutdown lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EnginePhase {
    Uninitialized,
    Initialized,
    ShutDown,
}

/// Result of a render attempt from the worker.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    Rendered,
    /// Readiness was cleared before the frame could start; nothing was called.
    NotReady,
}

struct Guarded<E> {
    engine: E,
    phase: EnginePhase,
    surface_bound: bool,
}

/// Serialized call surface into the engine.
///
/// Every engine call happens under one lock. Readiness is only changed while
/// holding that lock and is re-checked under it before each frame and each
/// injected event, so once `set_not_ready` returns no further render or input
/// call can start.
pub struct EngineBoundary<E: Engine> {
    inner: Mutex<Guarded<E>>,
    ready: AtomicBool,
}

impl<E: Engine> EngineBoundary<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Mutex::new(Guarded {
                engine,
                phase: EnginePhase::Uninitialized,
                surface_bound: false,
            }),
            ready: AtomicBool::new(false),
        }
    }

    pub fn banner(&self) -> String {
        self.inner.lock().engine.banner()
    }

    /// Lock-free readiness snapshot. Authoritative checks happen under the lock.
    pub fn readiness(&self) -> Readiness {
        if self.ready.load(Ordering::Acquire) {
            Readiness::Ready
        } else {
            Readiness::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness() == Readiness::Ready
    }

    pub fn phase(&self) -> EnginePhase {
        self.inner.lock().phase
    }

    pub fn surface_bound(&self) -> bool {
        self.inner.lock().surface_bound
    }

    pub fn init(&self, assets: Arc<dyn AssetLoader>, size: SurfaceSize) -> Result<()> {
        let mut g = self.inner.lock();
        if self.ready.load(Ordering::Acquire) {
            return Err(BridgeError::OrderingViolation("engine init while ready"));
        }
        if g.phase == EnginePhase::ShutDown {
            return Err(BridgeError::OrderingViolation("engine init after shutdown"));
        }

        g.engine.init(assets, size).map_err(BridgeError::Init)?;
        g.phase = EnginePhase::Initialized;
        Ok(())
    }

    /// Binds (`Some`) or unbinds (`None`) the surface.
    ///
    /// Unbinding an engine that was never initialized is a no-op: there is
    /// nothing for it to release.
    pub fn bind(&self, surface: Option<E::Surface>) -> Result<()> {
        let mut g = self.inner.lock();
        if self.ready.load(Ordering::Acquire) {
            return Err(BridgeError::OrderingViolation("surface bind while ready"));
        }

        match (surface, g.phase) {
            (Some(s), EnginePhase::Initialized) => {
                g.engine.bind_surface(Some(s)).map_err(BridgeError::Bind)?;
                g.surface_bound = true;
                Ok(())
            }
            (Some(_), _) => Err(BridgeError::OrderingViolation(
                "surface bind before engine init",
            )),
            (None, EnginePhase::Initialized) => {
                g.surface_bound = false;
                g.engine.bind_surface(None).map_err(BridgeError::Bind)
            }
            (None, _) => {
                g.surface_bound = false;
                Ok(())
            }
        }
    }

    pub fn set_ready(&self) -> Result<()> {
        let g = self.inner.lock();
        if g.phase != EnginePhase::Initialized || !g.surface_bound {
            return Err(BridgeError::OrderingViolation(
                "ready requires an initialized engine and a bound surface",
            ));
        }
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Clears readiness. Returns whether it was set.
    ///
    /// Blocks until any in-flight frame or injected event has finished.
    pub fn set_not_ready(&self) -> bool {
        let _g = self.inner.lock();
        self.ready.swap(false, Ordering::AcqRel)
    }

    pub fn render_frame(&self) -> Result<FrameStatus> {
        let mut g = self.inner.lock();
        if !self.ready.load(Ordering::Acquire) {
            return Ok(FrameStatus::NotReady);
        }
        g.engine.render_frame().map_err(BridgeError::Render)?;
        Ok(FrameStatus::Rendered)
    }

    /// Delivers `event` if ready. Returns whether it reached the engine.
    pub fn inject(&self, event: InputEvent) -> bool {
        let mut g = self.inner.lock();
        if !self.ready.load(Ordering::Acquire) {
            return false;
        }
        g.engine.inject_input(event);
        true
    }

    /// Shuts the engine down. Returns whether the engine was actually called.
    pub fn shutdown(&self) -> Result<bool> {
        let mut g = self.inner.lock();
        if self.ready.load(Ordering::Acquire) {
            return Err(BridgeError::OrderingViolation("engine shutdown while ready"));
        }

        match g.phase {
            EnginePhase::Initialized => {
                g.engine.shutdown();
                g.phase = EnginePhase::ShutDown;
                g.surface_bound = false;
                Ok(true)
            }
            EnginePhase::Uninitialized | EnginePhase::ShutDown => Ok(false),
        }
    }

    /// Runs `f` against the engine under the boundary lock.
    #[cfg(test)]
    pub(crate) fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(&mut self.inner.lock().engine)
    }
}
