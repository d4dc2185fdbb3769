//! Engine boundary.
//!
//! The engine is opaque: init, bind, render, input, shutdown. `Engine` is the
//! contract an engine implements; `EngineBoundary` is the adapter the bridge
//! calls through, enforcing call ordering and readiness gating.

mod boundary;
mod contract;

pub use boundary::{EngineBoundary, EnginePhase, FrameStatus, Readiness};
pub use contract::{AssetLoader, Engine, SurfaceSize};
