//! Logger setup for hosts embedding the bridge.
//!
//! The bridge itself only uses the `log` facade.

mod init;

pub use init::{LoggingConfig, init_logging};
