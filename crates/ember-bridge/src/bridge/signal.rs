use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::engine::{AssetLoader, SurfaceSize};
use crate::input::{RawKey, RawMotion};

/// Lifecycle and input notifications delivered by the host, in order.
///
/// Generic over the host's surface handle type.
pub enum HostSignal<S> {
    SurfaceCreated,
    SurfaceChanged {
        size: SurfaceSize,
        surface: S,
        assets: Arc<dyn AssetLoader>,
    },
    SurfaceDestroyed,
    ActivityDestroyed,
    Motion(RawMotion),
    Key(RawKey),
}

impl<S> fmt::Debug for HostSignal<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSignal::SurfaceCreated => f.write_str("SurfaceCreated"),
            HostSignal::SurfaceChanged { size, .. } => f
                .debug_struct("SurfaceChanged")
                .field("size", size)
                .finish_non_exhaustive(),
            HostSignal::SurfaceDestroyed => f.write_str("SurfaceDestroyed"),
            HostSignal::ActivityDestroyed => f.write_str("ActivityDestroyed"),
            HostSignal::Motion(m) => f.debug_tuple("Motion").field(m).finish(),
            HostSignal::Key(k) => f.debug_tuple("Key").field(k).finish(),
        }
    }
}

/// Host-side setup the bridge requests before any surface is initialized.
///
/// Both calls are best-effort: failures are logged and never block the
/// surface lifecycle.
pub trait HostServices {
    /// Hides system bars / enters borderless fullscreen.
    fn enter_immersive(&mut self) {}

    /// Boots the host audio subsystem.
    fn init_audio(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Host without chrome or audio.
#[derive(Debug, Default)]
pub struct NoHostServices;

impl HostServices for NoHostServices {}
