use std::sync::Arc;

use anyhow::{Context, Result, bail};
use winit::window::Window;

use ember_bridge::input::{InputEvent, KeyAction, TouchAction};
use ember_bridge::{AssetLoader, Engine, SurfaceSize};

use crate::gpu::{AcquireFailure, Gpu, GpuSurface};

/// Asset holding the base clear colour as three floats, e.g. `0.05 0.07 0.12`.
const CLEAR_COLOR_ASSET: &str = "clear_color.txt";

const DEFAULT_CLEAR: [f64; 3] = [0.05, 0.07, 0.12];

/// Demo engine: clears the bound window each frame.
///
/// The colour pulses slowly; active touches brighten it and the last touch
/// position shifts its hue.
pub struct ClearEngine {
    gpu: Option<Gpu>,
    surface: Option<GpuSurface>,
    size: SurfaceSize,
    base: [f64; 3],
    frame: u64,
    touches: usize,
    focus: (f32, f32),
}

impl ClearEngine {
    pub fn new() -> Self {
        Self {
            gpu: None,
            surface: None,
            size: SurfaceSize::new(0, 0),
            base: DEFAULT_CLEAR,
            frame: 0,
            touches: 0,
            focus: (0.5, 0.5),
        }
    }

    fn color(&self) -> wgpu::Color {
        let pulse = ((self.frame as f64) * 0.05).sin() * 0.5 + 0.5;
        let lift = 0.08 * pulse + 0.15 * self.touches.min(4) as f64;
        let (fx, fy) = (self.focus.0 as f64, self.focus.1 as f64);
        wgpu::Color {
            r: (self.base[0] + lift * fx).min(1.0),
            g: (self.base[1] + lift * fy).min(1.0),
            b: (self.base[2] + lift).min(1.0),
            a: 1.0,
        }
    }
}

impl Default for ClearEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for ClearEngine {
    type Surface = Arc<Window>;

    fn banner(&self) -> String {
        format!("ember clear engine v{}", env!("CARGO_PKG_VERSION"))
    }

    fn init(&mut self, assets: Arc<dyn AssetLoader>, size: SurfaceSize) -> Result<()> {
        if size.is_empty() {
            bail!("cannot initialize for a {}x{} surface", size.width, size.height);
        }
        self.size = size;

        if self.gpu.is_some() {
            log::debug!("engine already initialized; new size {}x{}", size.width, size.height);
            return Ok(());
        }

        self.base = match assets.read(CLEAR_COLOR_ASSET) {
            Ok(bytes) => parse_color(&bytes)
                .with_context(|| format!("invalid {CLEAR_COLOR_ASSET}"))?,
            Err(e) => {
                log::debug!("{CLEAR_COLOR_ASSET} not loaded ({e:#}); using default");
                DEFAULT_CLEAR
            }
        };

        self.gpu = Some(Gpu::new()?);
        log::info!("engine initialized: {}x{}", size.width, size.height);
        Ok(())
    }

    fn bind_surface(&mut self, surface: Option<Arc<Window>>) -> Result<()> {
        // Old swapchain goes first; one window cannot back two surfaces.
        self.surface = None;

        let Some(window) = surface else {
            log::info!("surface cleared");
            return Ok(());
        };
        let gpu = self.gpu.as_ref().context("engine not initialized")?;
        let target = gpu.create_surface(window, self.size.width, self.size.height)?;
        log::info!("surface set: {:?}", target.size());
        self.surface = Some(target);
        Ok(())
    }

    fn render_frame(&mut self) -> Result<()> {
        let (Some(gpu), Some(target)) = (&self.gpu, &self.surface) else {
            bail!("render without a bound surface");
        };

        match gpu.clear(target, self.color()) {
            Ok(()) => {}
            Err(AcquireFailure::Fatal) => bail!("surface out of memory"),
            Err(other) => log::debug!("frame {} skipped: {other:?}", self.frame),
        }
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }

    fn inject_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Touch { action, pointer, x, y } => {
                match action {
                    TouchAction::Down => self.touches += 1,
                    TouchAction::Up => self.touches = self.touches.saturating_sub(1),
                    TouchAction::Move => {}
                }
                let (w, h) = (self.size.width.max(1) as f32, self.size.height.max(1) as f32);
                self.focus = ((x / w).clamp(0.0, 1.0), (y / h).clamp(0.0, 1.0));
                log::trace!("touch {action:?} pointer {pointer} at ({x:.1}, {y:.1})");
            }
            InputEvent::Key { action: KeyAction::Down, code } => {
                log::debug!("key down {code}");
            }
            InputEvent::Key { .. } => {}
        }
    }

    fn shutdown(&mut self) {
        self.surface = None;
        self.gpu = None;
        log::info!("engine destroyed after {} frames", self.frame);
    }
}

fn parse_color(bytes: &[u8]) -> Result<[f64; 3]> {
    let text = std::str::from_utf8(bytes).context("not utf-8")?;
    let parts: Vec<f64> = text
        .split_whitespace()
        .map(|p| p.parse::<f64>().with_context(|| format!("bad component {p:?}")))
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok([r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]),
        _ => bail!("expected 3 components, found {}", parts.len()),
    }
}
