//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use parking_lot::Mutex;

use crate::engine::{AssetLoader, Engine, SurfaceSize};
use crate::input::InputEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init(SurfaceSize),
    Bind(Option<u32>),
    Render,
    Input(InputEvent),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub call: Call,
    pub at: Instant,
    pub thread: ThreadId,
}

/// Shared, clonable view of everything a `RecordingEngine` was asked to do.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Record>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().push(Record {
            call,
            at: Instant::now(),
            thread: thread::current().id(),
        });
    }

    pub fn records(&self) -> Vec<Record> {
        self.0.lock().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().iter().map(|r| r.call.clone()).collect()
    }

    /// Calls with consecutive renders collapsed into one.
    pub fn calls_collapsed(&self) -> Vec<Call> {
        let mut out: Vec<Call> = Vec::new();
        for c in self.calls() {
            if c == Call::Render && out.last() == Some(&Call::Render) {
                continue;
            }
            out.push(c);
        }
        out
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|r| pred(&r.call)).count()
    }

    pub fn renders(&self) -> usize {
        self.count(|c| *c == Call::Render)
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

/// Engine double recording each boundary call. Surfaces are plain integers.
pub struct RecordingEngine {
    log: CallLog,
    fail_init: bool,
    fail_bind: bool,
    fail_render_at: Option<usize>,
    panic_render_at: Option<usize>,
    render_cost: Duration,
    rendered: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            fail_init: false,
            fail_bind: false,
            fail_render_at: None,
            panic_render_at: None,
            render_cost: Duration::ZERO,
            rendered: 0,
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_bind(mut self) -> Self {
        self.fail_bind = true;
        self
    }

    /// The `n`th render call (1-based) returns an error.
    pub fn failing_render_at(mut self, n: usize) -> Self {
        self.fail_render_at = Some(n);
        self
    }

    /// The `n`th render call (1-based) panics.
    pub fn panicking_render_at(mut self, n: usize) -> Self {
        self.panic_render_at = Some(n);
        self
    }

    pub fn render_cost(mut self, cost: Duration) -> Self {
        self.render_cost = cost;
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl Engine for RecordingEngine {
    type Surface = u32;

    fn banner(&self) -> String {
        "recording engine".into()
    }

    fn init(&mut self, _assets: Arc<dyn AssetLoader>, size: SurfaceSize) -> Result<()> {
        self.log.push(Call::Init(size));
        if self.fail_init {
            bail!("rejected {}x{}", size.width, size.height);
        }
        Ok(())
    }

    fn bind_surface(&mut self, surface: Option<u32>) -> Result<()> {
        self.log.push(Call::Bind(surface));
        if self.fail_bind && surface.is_some() {
            bail!("cannot attach surface");
        }
        Ok(())
    }

    fn render_frame(&mut self) -> Result<()> {
        self.log.push(Call::Render);
        self.rendered += 1;
        if !self.render_cost.is_zero() {
            thread::sleep(self.render_cost);
        }
        if self.panic_render_at == Some(self.rendered) {
            panic!("engine blew up on frame {}", self.rendered);
        }
        if self.fail_render_at == Some(self.rendered) {
            bail!("device lost on frame {}", self.rendered);
        }
        Ok(())
    }

    fn inject_input(&mut self, event: InputEvent) {
        self.log.push(Call::Input(event));
    }

    fn shutdown(&mut self) {
        self.log.push(Call::Shutdown);
    }
}

pub struct NoAssets;

impl NoAssets {
    pub fn shared() -> Arc<dyn AssetLoader> {
        Arc::new(NoAssets)
    }
}

impl AssetLoader for NoAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        bail!("no asset named {path}")
    }
}
