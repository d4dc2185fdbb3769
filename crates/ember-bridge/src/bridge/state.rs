use std::fmt;

/// Lifecycle state of a [`SurfaceBridge`](super::SurfaceBridge).
///
/// `Idle → EngineInitializing → SurfaceBinding → Ready → TearingDown → Idle`.
/// The intermediate states only exist for the duration of the lifecycle call
/// that passes through them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleState {
    Idle,
    EngineInitializing,
    SurfaceBinding,
    Ready,
    TearingDown,
}

impl LifecycleState {
    /// Whether `next` is a legal successor of `self`.
    ///
    /// `Ready → EngineInitializing` is a rebind (resize or surface re-creation);
    /// the previous worker is retired before the transition. Any in-flight
    /// state may fall back to `Idle` on failure.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Idle, EngineInitializing)
                | (EngineInitializing, SurfaceBinding)
                | (EngineInitializing, Idle)
                | (SurfaceBinding, Ready)
                | (SurfaceBinding, Idle)
                | (Ready, EngineInitializing)
                | (Ready, TearingDown)
                | (TearingDown, Idle)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::EngineInitializing => "engine-initializing",
            LifecycleState::SurfaceBinding => "surface-binding",
            LifecycleState::Ready => "ready",
            LifecycleState::TearingDown => "tearing-down",
        };
        f.write_str(s)
    }
}
