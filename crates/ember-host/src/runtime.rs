use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use ember_bridge::input::RawKey;
use ember_bridge::input::codes::{KEY_ACTION_DOWN, KEY_ACTION_UP};
use ember_bridge::{AssetLoader, SurfaceBridge, SurfaceSize};

use crate::assets::DirAssets;
use crate::config::HostConfig;
use crate::engine::ClearEngine;
use crate::services::WindowServices;
use crate::touch::{Contact, TouchTracker};

/// Entry point for the desktop host.
pub struct Runtime;

impl Runtime {
    pub fn run(config: HostConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        // The bridge paces frames on its own thread; the UI loop only waits for events.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut state = HostState::new(config);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// Maps winit's application lifecycle onto bridge signals.
///
/// resumed → activity/surface created + surface changed, resized → surface
/// changed, suspended → surface destroyed, close/exit → activity destroyed.
struct HostState {
    config: HostConfig,
    bridge: SurfaceBridge<ClearEngine>,
    assets: Arc<dyn AssetLoader>,

    window: Option<Arc<Window>>,
    activity_started: bool,

    touches: TouchTracker,
    cursor: (f32, f32),
}

impl HostState {
    fn new(config: HostConfig) -> Self {
        let bridge = SurfaceBridge::new(ClearEngine::new(), config.bridge.clone());
        let assets: Arc<dyn AssetLoader> = Arc::new(DirAssets::new(config.asset_root.clone()));
        Self {
            config,
            bridge,
            assets,
            window: None,
            activity_started: false,
            touches: TouchTracker::default(),
            cursor: (0.0, 0.0),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        Ok(Arc::new(window))
    }

    fn services<'a>(window: &'a Window, config: &HostConfig) -> WindowServices<'a> {
        WindowServices {
            window,
            immersive: config.immersive,
        }
    }

    /// Rebinds for `size`, or releases the surface when it has no area.
    fn surface_changed(&mut self, size: PhysicalSize<u32>) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let size = SurfaceSize::new(size.width, size.height);
        if size.is_empty() {
            log::debug!("surface has no area; releasing it");
            self.bridge.surface_destroyed();
            return;
        }

        // winit repeats the current size after creating a window. A stalled
        // worker still gets a fresh cycle.
        if self.bridge.is_ready() && self.bridge.is_rendering() && self.bridge.surface_size() == Some(size) {
            log::trace!("surface already bound at {}x{}", size.width, size.height);
            return;
        }

        if let Err(e) = self.bridge.surface_changed(size, window, self.assets.clone()) {
            // No retry: the next resize or resume starts a fresh cycle.
            log::error!("surface unusable: {e}");
        }
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.bridge.activity_destroyed() {
            log::error!("{e}");
        }
        self.window = None;
        event_loop.exit();
    }

    fn pointer(&mut self, contact: Contact, phase: TouchPhase, x: f32, y: f32) {
        let motion = match phase {
            TouchPhase::Started => self.touches.press(contact, x, y),
            TouchPhase::Moved => self.touches.moved(contact, x, y),
            TouchPhase::Ended => self.touches.release(contact, x, y),
            TouchPhase::Cancelled => self.touches.cancel(),
        };
        if let Some(motion) = motion {
            self.bridge.on_motion(&motion);
        }
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match &self.window {
            Some(w) => w.clone(),
            None => match self.create_window(event_loop) {
                Ok(w) => {
                    self.window = Some(w.clone());
                    w
                }
                Err(e) => {
                    log::error!("{e:#}");
                    event_loop.exit();
                    return;
                }
            },
        };

        if !self.activity_started {
            let mut services = Self::services(&window, &self.config);
            self.bridge.activity_created(&mut services);
            self.activity_started = true;
        }

        self.bridge.surface_created();
        self.surface_changed(window.inner_size());
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(motion) = self.touches.cancel() {
            self.bridge.on_motion(&motion);
        }
        self.bridge.surface_destroyed();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop),

            WindowEvent::Resized(size) => self.surface_changed(size),

            WindowEvent::Focused(focused) => {
                if let Some(window) = self.window.clone() {
                    let mut services = Self::services(&window, &self.config);
                    self.bridge.window_focus_changed(&mut services, focused);
                }
            }

            WindowEvent::Touch(touch) => {
                let (x, y) = (touch.location.x as f32, touch.location.y as f32);
                self.pointer(Contact::Finger(touch.id), touch.phase, x, y);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                if self.touches.is_pressed(Contact::Mouse) {
                    let (x, y) = self.cursor;
                    self.pointer(Contact::Mouse, TouchPhase::Moved, x, y);
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let phase = match state {
                    ElementState::Pressed => TouchPhase::Started,
                    ElementState::Released => TouchPhase::Ended,
                };
                let (x, y) = self.cursor;
                self.pointer(Contact::Mouse, phase, x, y);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let action = match event.state {
                    ElementState::Pressed => KEY_ACTION_DOWN,
                    ElementState::Released => KEY_ACTION_UP,
                };
                self.bridge.on_key(RawKey::new(action, code as i32));
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.bridge.is_destroyed() {
            if let Err(e) = self.bridge.activity_destroyed() {
                log::error!("{e}");
            }
        }
    }
}
