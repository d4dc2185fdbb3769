use std::time::Duration;

/// Pause between two frames of the render worker (~60 Hz).
///
/// Policy constant. It is not negotiated with the engine.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The worker logs a heartbeat every this many frames (~1 s at the default interval).
pub const DEFAULT_HEARTBEAT_FRAMES: u64 = 60;

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Sleep between the end of one frame and the start of the next.
    pub frame_interval: Duration,

    /// Frames between two heartbeat log lines. `0` disables the heartbeat.
    pub heartbeat_every: u64,

    /// Thread name prefix for render workers. The bind cycle number is appended.
    pub worker_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            heartbeat_every: DEFAULT_HEARTBEAT_FRAMES,
            worker_name: "ember-render".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_heartbeat_every(mut self, frames: u64) -> Self {
        self.heartbeat_every = frames;
        self
    }

    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }
}
