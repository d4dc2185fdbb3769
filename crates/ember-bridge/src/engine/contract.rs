use std::sync::Arc;

use anyhow::Result;

use crate::input::InputEvent;

/// Surface dimensions in physical pixels, as reported by the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Read-only resource access supplied by the host at engine-init time.
///
/// The bridge forwards it to [`Engine::init`] and never keeps a copy.
pub trait AssetLoader: Send + Sync {
    /// Reads the whole asset at `path` (relative to the host's asset root).
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether `path` exists. Defaults to attempting a read.
    fn exists(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}

/// Contract implemented by the engine behind the bridge.
///
/// The bridge guarantees:
/// - `bind_surface` and `render_frame` only after a successful `init`
/// - `render_frame` and `inject_input` only while a surface is bound
/// - `bind_surface(None)` before a bound surface becomes invalid
/// - `shutdown` at most once, after the render worker has exited
///
/// Calls arrive from two threads (host UI thread and render worker), never
/// concurrently: the bridge serializes them.
pub trait Engine: Send + 'static {
    /// Platform drawable handle. Cloned into the engine on bind.
    type Surface: Clone + Send + 'static;

    /// Connectivity string logged when the host activity starts.
    fn banner(&self) -> String {
        String::from("engine linked")
    }

    /// Prepares the engine for a surface of `size`.
    ///
    /// Called on every surface change; the engine decides whether a repeat
    /// call reinitializes or is a no-op.
    fn init(&mut self, assets: Arc<dyn AssetLoader>, size: SurfaceSize) -> Result<()>;

    /// Attaches (`Some`) or detaches (`None`) the drawable surface.
    fn bind_surface(&mut self, surface: Option<Self::Surface>) -> Result<()>;

    /// Renders one frame into the bound surface.
    fn render_frame(&mut self) -> Result<()>;

    /// Fire-and-forget input delivery.
    fn inject_input(&mut self, event: InputEvent);

    /// Releases engine resources. Not followed by any other call.
    fn shutdown(&mut self);
}
