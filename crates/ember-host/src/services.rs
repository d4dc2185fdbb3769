use anyhow::Result;
use winit::window::{Fullscreen, Window};

use ember_bridge::HostServices;

/// Host chrome and audio for a desktop window.
pub struct WindowServices<'a> {
    pub window: &'a Window,
    pub immersive: bool,
}

impl HostServices for WindowServices<'_> {
    fn enter_immersive(&mut self) {
        if self.immersive && self.window.fullscreen().is_none() {
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }

    fn init_audio(&mut self) -> Result<()> {
        log::info!("no audio backend in the desktop host; running silent");
        Ok(())
    }
}
