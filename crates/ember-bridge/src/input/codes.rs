//! Platform action codes.
//!
//! Hosts report motion actions as a packed integer: the low byte is the
//! action, the second byte is the index of the pointer the action applies to
//! (for secondary-pointer down/up). Key actions are plain integers.

use super::types::KeyAction;

pub const ACTION_MASK: i32 = 0xff;
pub const POINTER_INDEX_MASK: i32 = 0xff00;
pub const POINTER_INDEX_SHIFT: i32 = 8;

pub const ACTION_DOWN: i32 = 0;
pub const ACTION_UP: i32 = 1;
pub const ACTION_MOVE: i32 = 2;
pub const ACTION_CANCEL: i32 = 3;
pub const ACTION_POINTER_DOWN: i32 = 5;
pub const ACTION_POINTER_UP: i32 = 6;

pub const KEY_ACTION_DOWN: i32 = 0;
pub const KEY_ACTION_UP: i32 = 1;

/// Decoded motion action.
///
/// `Down`/`Up` carry the host index of the pointer that changed state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MotionAction {
    Down { index: usize },
    Up { index: usize },
    Move,
    Cancel,
}

impl MotionAction {
    /// Decodes a packed host action code. Unknown actions (hover, scroll, ...) yield `None`.
    pub fn decode(code: i32) -> Option<Self> {
        let index = ((code & POINTER_INDEX_MASK) >> POINTER_INDEX_SHIFT) as usize;
        match code & ACTION_MASK {
            ACTION_DOWN => Some(MotionAction::Down { index: 0 }),
            ACTION_UP => Some(MotionAction::Up { index: 0 }),
            ACTION_POINTER_DOWN => Some(MotionAction::Down { index }),
            ACTION_POINTER_UP => Some(MotionAction::Up { index }),
            ACTION_MOVE => Some(MotionAction::Move),
            ACTION_CANCEL => Some(MotionAction::Cancel),
            _ => None,
        }
    }

    /// Packs an action back into a host code. Used by hosts that synthesize batches.
    pub fn encode(self, pointer_count: usize) -> i32 {
        match self {
            MotionAction::Down { index } if pointer_count <= 1 && index == 0 => ACTION_DOWN,
            MotionAction::Up { index } if pointer_count <= 1 && index == 0 => ACTION_UP,
            MotionAction::Down { index } => ACTION_POINTER_DOWN | pack_index(index),
            MotionAction::Up { index } => ACTION_POINTER_UP | pack_index(index),
            MotionAction::Move => ACTION_MOVE,
            MotionAction::Cancel => ACTION_CANCEL,
        }
    }
}

fn pack_index(index: usize) -> i32 {
    ((index as i32) << POINTER_INDEX_SHIFT) & POINTER_INDEX_MASK
}

/// Decodes a host key action. Repeat/multiple actions yield `None`.
pub fn decode_key_action(code: i32) -> Option<KeyAction> {
    match code {
        KEY_ACTION_DOWN => Some(KeyAction::Down),
        KEY_ACTION_UP => Some(KeyAction::Up),
        _ => None,
    }
}
