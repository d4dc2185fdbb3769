//! Ember surface bridge.
//!
//! Sits between a host that owns a drawable surface and an opaque engine.
//! The host reports lifecycle and input; the bridge decides when the engine
//! may be initialized, bound, rendered, fed input and shut down, and runs the
//! render loop on its own thread.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod worker;

#[cfg(test)]
mod testing;

pub use bridge::{HostServices, HostSignal, LifecycleState, NoHostServices, SurfaceBridge};
pub use config::BridgeConfig;
pub use engine::{AssetLoader, Engine, SurfaceSize};
pub use error::BridgeError;
