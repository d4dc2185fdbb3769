//! Input normalization.
//!
//! Hosts deliver packed platform action codes with every active pointer in
//! the batch. This module turns them into single-pointer [`InputEvent`]s.
//! Forwarding to the engine is gated elsewhere (see `bridge`).

pub mod codes;
mod normalizer;
mod types;

pub use codes::MotionAction;
pub use normalizer::EventNormalizer;
pub use types::{InputEvent, KeyAction, PointerId, RawKey, RawMotion, RawPointer, TouchAction};
