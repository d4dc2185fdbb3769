use std::collections::BTreeMap;

use super::codes::{MotionAction, decode_key_action};
use super::types::{InputEvent, PointerId, RawKey, RawMotion, RawPointer, TouchAction};

/// Turns host motion/key notifications into normalized [`InputEvent`]s.
///
/// Owns the only copy of the active-pointer map. The map is bookkeeping for
/// normalization; gesture semantics belong to the engine.
#[derive(Debug, Default)]
pub struct EventNormalizer {
    /// Active pointers and their last known position, ordered by id.
    active: BTreeMap<PointerId, (f32, f32)>,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes one host motion batch.
    ///
    /// - down/up: one event for the pointer at the reported index
    /// - move: one event per reported pointer, in host index order
    /// - cancel: one `Up` per active pointer, ascending id, then the map is empty
    pub fn normalize_motion(&mut self, motion: &RawMotion) -> Vec<InputEvent> {
        let Some(action) = MotionAction::decode(motion.action) else {
            log::trace!("ignoring motion action {:#06x}", motion.action);
            return Vec::new();
        };

        match action {
            MotionAction::Down { index } => {
                let Some(p) = pointer_at(motion, index) else {
                    return Vec::new();
                };
                if self.active.insert(p.id, (p.x, p.y)).is_some() {
                    log::debug!("pointer {} went down twice without an up", p.id);
                }
                vec![touch(TouchAction::Down, p.id, (p.x, p.y))]
            }

            MotionAction::Up { index } => {
                let Some(p) = pointer_at(motion, index) else {
                    return Vec::new();
                };
                self.active.remove(&p.id);
                vec![touch(TouchAction::Up, p.id, (p.x, p.y))]
            }

            MotionAction::Move => motion
                .pointers
                .iter()
                .map(|p| {
                    self.track(p);
                    touch(TouchAction::Move, p.id, (p.x, p.y))
                })
                .collect(),

            MotionAction::Cancel => {
                for p in &motion.pointers {
                    self.track(p);
                }
                self.release_all()
            }
        }
    }

    /// Normalizes a host key notification. Repeats and unknown actions yield `None`.
    pub fn normalize_key(&self, key: RawKey) -> Option<InputEvent> {
        let action = decode_key_action(key.action)?;
        Some(InputEvent::Key {
            action,
            code: key.code,
        })
    }

    /// Emits an `Up` for every active pointer (ascending id) and clears the map.
    pub fn release_all(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.active)
            .into_iter()
            .map(|(id, pos)| touch(TouchAction::Up, id, pos))
            .collect()
    }

    pub fn is_active(&self, id: PointerId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn position(&self, id: PointerId) -> Option<(f32, f32)> {
        self.active.get(&id).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Updates the position of an active pointer; unknown ids stay untracked.
    fn track(&mut self, p: &RawPointer) {
        if let Some(pos) = self.active.get_mut(&p.id) {
            *pos = (p.x, p.y);
        }
    }

    pub fn active_pointers(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.active.keys().copied()
    }
}

fn pointer_at(motion: &RawMotion, index: usize) -> Option<&RawPointer> {
    let p = motion.pointers.get(index);
    if p.is_none() {
        log::warn!(
            "motion action {:#06x} names pointer index {index} but only {} pointers were reported",
            motion.action,
            motion.pointers.len()
        );
    }
    p
}

fn touch(action: TouchAction, pointer: PointerId, (x, y): (f32, f32)) -> InputEvent {
    InputEvent::Touch { action, pointer, x, y }
}
