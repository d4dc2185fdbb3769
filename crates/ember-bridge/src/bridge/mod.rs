//! Surface lifecycle controller.
//!
//! `SurfaceBridge` receives host lifecycle and input signals on the host's UI
//! thread and decides when the engine may be called. It owns the bound
//! surface handle, the render worker of the current bind cycle and the
//! input normalizer.
//!
//! Teardown order is fixed: readiness cleared, worker stopped and joined,
//! surface unbound, handle dropped. Shutdown follows only on activity destroy.

mod signal;
mod state;

pub use signal::{HostServices, HostSignal, NoHostServices};
pub use state::LifecycleState;

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::engine::{AssetLoader, Engine, EngineBoundary, EnginePhase, Readiness, SurfaceSize};
use crate::error::{BridgeError, Result};
use crate::input::{EventNormalizer, InputEvent, RawKey, RawMotion};
use crate::worker::{RenderWorker, WorkerExit};

pub struct SurfaceBridge<E: Engine> {
    config: BridgeConfig,
    boundary: Arc<EngineBoundary<E>>,
    state: LifecycleState,

    // Declared before `surface` so an implicit drop joins the worker first.
    worker: Option<RenderWorker>,
    surface: Option<E::Surface>,
    size: Option<SurfaceSize>,

    normalizer: EventNormalizer,

    host_prepared: bool,
    destroyed: bool,
    cycles: u64,
    last_exit: Option<WorkerExit>,
    dropped_events: u64,
}

impl<E: Engine> SurfaceBridge<E> {
    pub fn new(engine: E, config: BridgeConfig) -> Self {
        Self {
            config,
            boundary: Arc::new(EngineBoundary::new(engine)),
            state: LifecycleState::Idle,
            worker: None,
            surface: None,
            size: None,
            normalizer: EventNormalizer::new(),
            host_prepared: false,
            destroyed: false,
            cycles: 0,
            last_exit: None,
            dropped_events: 0,
        }
    }

    // ── host setup ────────────────────────────────────────────────────────

    /// Requests host chrome and audio setup. Call before the first surface change.
    pub fn activity_created(&mut self, host: &mut dyn HostServices) {
        log::info!("activity created; engine link: {}", self.boundary.banner());

        host.enter_immersive();
        if let Err(e) = host.init_audio() {
            log::warn!("audio bootstrap failed, continuing without audio: {e:#}");
        }

        self.host_prepared = true;
    }

    /// Immersive mode is dropped by some hosts when focus leaves the window.
    pub fn window_focus_changed(&mut self, host: &mut dyn HostServices, focused: bool) {
        if focused {
            host.enter_immersive();
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Routes one host signal to the matching lifecycle or input call.
    pub fn dispatch(&mut self, signal: HostSignal<E::Surface>) -> Result<()> {
        match signal {
            HostSignal::SurfaceCreated => self.surface_created(),
            HostSignal::SurfaceChanged {
                size,
                surface,
                assets,
            } => return self.surface_changed(size, surface, assets),
            HostSignal::SurfaceDestroyed => self.surface_destroyed(),
            HostSignal::ActivityDestroyed => return self.activity_destroyed(),
            HostSignal::Motion(m) => {
                self.on_motion(&m);
            }
            HostSignal::Key(k) => {
                self.on_key(k);
            }
        }
        Ok(())
    }

    /// Nothing is bound until the host reports dimensions.
    pub fn surface_created(&mut self) {
        log::info!("surface created; waiting for dimensions");
    }

    /// Initializes the engine for `size`, binds `surface` and starts rendering.
    ///
    /// In `Ready` this is a rebind: the current worker is retired first. On
    /// failure the bridge is back in `Idle` with nothing bound.
    pub fn surface_changed(
        &mut self,
        size: SurfaceSize,
        surface: E::Surface,
        assets: Arc<dyn AssetLoader>,
    ) -> Result<()> {
        if self.destroyed {
            return Err(self.violation("surface change after activity destroyed"));
        }
        if !self.host_prepared {
            log::warn!("surface changed before host setup was requested");
        }

        log::info!("surface changed: {}x{}", size.width, size.height);

        match self.state {
            LifecycleState::Idle => {}
            LifecycleState::Ready => {
                log::debug!("rebinding; retiring bind cycle {}", self.cycles);
                self.boundary.set_not_ready();
                self.retire_worker();
            }
            other => {
                return Err(self.violation_in(other, "surface change re-entered"));
            }
        }

        self.transition(LifecycleState::EngineInitializing);
        if let Err(e) = self.boundary.init(assets, size) {
            log::error!("{e}");
            self.abort_cycle();
            return Err(e);
        }

        self.transition(LifecycleState::SurfaceBinding);
        if let Err(e) = self.boundary.bind(Some(surface.clone())) {
            log::error!("{e}");
            self.abort_cycle();
            return Err(e);
        }
        self.surface = Some(surface);
        self.size = Some(size);

        if let Err(e) = self.boundary.set_ready() {
            self.abort_cycle();
            return Err(e);
        }

        self.cycles += 1;
        match RenderWorker::spawn(self.boundary.clone(), &self.config, self.cycles) {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                log::error!("{e}");
                self.boundary.set_not_ready();
                self.abort_cycle();
                return Err(e);
            }
        }

        self.transition(LifecycleState::Ready);
        Ok(())
    }

    /// Stops rendering and unbinds the surface before returning.
    ///
    /// A no-op unless `Ready`.
    pub fn surface_destroyed(&mut self) {
        log::info!("surface destroyed");
        if self.state != LifecycleState::Ready {
            log::debug!("surface destroyed while {}; nothing bound", self.state);
            return;
        }
        self.teardown();
    }

    /// Tears down any bound surface, then shuts the engine down once.
    pub fn activity_destroyed(&mut self) -> Result<()> {
        log::info!("activity destroyed");
        if self.destroyed {
            log::debug!("activity already destroyed");
            return Ok(());
        }

        if self.state == LifecycleState::Ready {
            self.teardown();
        }

        if self.worker.is_some() {
            return Err(self.violation("engine shutdown with a live render worker"));
        }

        if self.boundary.shutdown()? {
            log::info!("engine shut down after {} bind cycles", self.cycles);
        }
        self.destroyed = true;
        Ok(())
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Normalizes a host motion batch and forwards it if ready.
    ///
    /// Returns how many events reached the engine. Events arriving while not
    /// ready are dropped, not queued.
    pub fn on_motion(&mut self, motion: &RawMotion) -> usize {
        let events = self.normalizer.normalize_motion(motion);
        self.forward(events)
    }

    /// Forwards a host key notification if ready. Returns whether it reached the engine.
    pub fn on_key(&mut self, key: RawKey) -> bool {
        match self.normalizer.normalize_key(key) {
            Some(ev) => self.forward([ev]) == 1,
            None => false,
        }
    }

    fn forward(&mut self, events: impl IntoIterator<Item = InputEvent>) -> usize {
        let mut delivered = 0;
        for ev in events {
            if self.boundary.inject(ev) {
                delivered += 1;
            } else {
                self.dropped_events += 1;
                log::trace!("dropped {ev:?}: engine not ready");
            }
        }
        delivered
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn readiness(&self) -> Readiness {
        self.boundary.readiness()
    }

    pub fn is_ready(&self) -> bool {
        self.boundary.is_ready()
    }

    pub fn engine_phase(&self) -> EnginePhase {
        self.boundary.phase()
    }

    /// Handle of the currently bound surface, if any.
    pub fn surface(&self) -> Option<&E::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Whether frames are currently being produced.
    ///
    /// False while `Ready` if the worker stopped on a render failure. The
    /// engine stays ready with its surface bound in that case, so input is
    /// still injected until the next surface change or teardown.
    pub fn is_rendering(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| w.is_running() && !w.is_finished())
    }

    /// Number of bind cycles started so far.
    pub fn bind_cycles(&self) -> u64 {
        self.cycles
    }

    /// Exit reason of the most recently joined worker.
    pub fn last_worker_exit(&self) -> Option<WorkerExit> {
        self.last_exit
    }

    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn normalizer(&self) -> &EventNormalizer {
        &self.normalizer
    }

    #[cfg(test)]
    pub(crate) fn boundary(&self) -> &EngineBoundary<E> {
        &self.boundary
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn teardown(&mut self) {
        self.transition(LifecycleState::TearingDown);

        self.boundary.set_not_ready();
        self.retire_worker();

        if let Err(e) = self.boundary.bind(None) {
            log::error!("{e}");
        }
        self.surface = None;
        self.size = None;

        let lost = self.normalizer.release_all();
        if !lost.is_empty() {
            log::debug!("{} pointers were down at teardown; gesture lost", lost.len());
        }

        self.transition(LifecycleState::Idle);
    }

    /// Stops and joins the current worker. Readiness must already be cleared.
    fn retire_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let cycle = worker.cycle();
            let exit = worker.stop_and_join();
            log::debug!("bind cycle {cycle} worker joined ({exit:?})");
            self.last_exit = Some(exit);
        }
    }

    /// Drops whatever the failed cycle got bound and returns to `Idle`.
    fn abort_cycle(&mut self) {
        self.retire_worker();
        if let Err(e) = self.boundary.bind(None) {
            log::error!("{e}");
        }
        self.surface = None;
        self.size = None;
        self.state = LifecycleState::Idle;
    }

    fn transition(&mut self, next: LifecycleState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        log::trace!("lifecycle {} -> {}", self.state, next);
        self.state = next;
    }

    fn violation(&self, what: &'static str) -> BridgeError {
        self.violation_in(self.state, what)
    }

    fn violation_in(&self, state: LifecycleState, what: &'static str) -> BridgeError {
        log::error!("ordering violation in state {state}: {what}");
        BridgeError::OrderingViolation(what)
    }
}

impl<E: Engine> Drop for SurfaceBridge<E> {
    fn drop(&mut self) {
        if self.state == LifecycleState::Ready {
            log::warn!("bridge dropped while ready; tearing down without engine shutdown");
            self.teardown();
        }
    }
}
