use std::fmt;

/// Failures surfaced by the bridge.
///
/// `Init` and `Bind` propagate synchronously out of the lifecycle call that
/// triggered them. `Render` never leaves the worker thread; it is reported
/// through [`WorkerExit`](crate::worker::WorkerExit) and the log.
#[derive(Debug)]
pub enum BridgeError {
    /// Engine rejected the dimensions or the asset loader. Fatal to the bind cycle.
    Init(anyhow::Error),
    /// Engine failed to attach the surface.
    Bind(anyhow::Error),
    /// A single frame failed; the worker stopped rendering.
    Render(anyhow::Error),
    /// An internal ordering invariant was breached. Programming defect.
    OrderingViolation(&'static str),
    /// The render thread could not be started.
    WorkerSpawn(std::io::Error),
}

impl BridgeError {
    /// Whether this error indicates a defect in the caller rather than an engine failure.
    pub fn is_defect(&self) -> bool {
        matches!(self, BridgeError::OrderingViolation(_))
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Init(e) => write!(f, "engine initialization failed: {e:#}"),
            BridgeError::Bind(e) => write!(f, "surface bind failed: {e:#}"),
            BridgeError::Render(e) => write!(f, "frame render failed: {e:#}"),
            BridgeError::OrderingViolation(what) => write!(f, "ordering violation: {what}"),
            BridgeError::WorkerSpawn(e) => write!(f, "failed to spawn render worker: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Init(e) | BridgeError::Bind(e) | BridgeError::Render(e) => Some(&**e),
            BridgeError::WorkerSpawn(e) => Some(e),
            BridgeError::OrderingViolation(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
