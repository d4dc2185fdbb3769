/// Host-assigned pointer identity.
///
/// Stable for the duration of one gesture. Not guaranteed stable across gestures.
pub type PointerId = i32;

/// Touch action vocabulary delivered to the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TouchAction {
    Down,
    Up,
    Move,
}

/// Key action vocabulary delivered to the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyAction {
    Down,
    Up,
}

/// Normalized input event handed to [`Engine::inject_input`](crate::engine::Engine::inject_input).
///
/// Every touch event carries exactly one pointer. Multi-pointer batches from
/// the host are split into one event per pointer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Touch {
        action: TouchAction,
        pointer: PointerId,
        x: f32,
        y: f32,
    },
    Key {
        action: KeyAction,
        /// Platform key code, passed through untouched.
        code: i32,
    },
}

/// One pointer sample inside a host motion batch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RawPointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl RawPointer {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Motion batch as the host reports it.
///
/// `action` is the platform action code (see [`MotionAction::decode`](super::MotionAction::decode));
/// `pointers` lists every pointer currently on the surface, in host index order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMotion {
    pub action: i32,
    pub pointers: Vec<RawPointer>,
}

impl RawMotion {
    pub fn new(action: i32, pointers: Vec<RawPointer>) -> Self {
        Self { action, pointers }
    }
}

/// Key notification as the host reports it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawKey {
    pub action: i32,
    pub code: i32,
}

impl RawKey {
    pub fn new(action: i32, code: i32) -> Self {
        Self { action, code }
    }
}
