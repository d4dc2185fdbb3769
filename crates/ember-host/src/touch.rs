use ember_bridge::input::codes::ACTION_MOVE;
use ember_bridge::input::{MotionAction, PointerId, RawMotion, RawPointer};

/// Physical source of a contact.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Contact {
    Mouse,
    Finger(u64),
}

/// Folds winit's per-contact touch events into host motion batches.
///
/// winit reports one contact per event; the bridge expects every active
/// pointer in each batch with a packed action code. Pointer ids are the
/// lowest free non-negative integers, reused once released.
#[derive(Debug, Default)]
pub struct TouchTracker {
    contacts: Vec<(Contact, RawPointer)>,
}

impl TouchTracker {
    pub fn press(&mut self, contact: Contact, x: f32, y: f32) -> Option<RawMotion> {
        if self.index_of(contact).is_some() {
            return None;
        }
        let id = self.next_id();
        self.contacts.push((contact, RawPointer::new(id, x, y)));
        let index = self.contacts.len() - 1;
        Some(self.batch(MotionAction::Down { index }.encode(self.contacts.len())))
    }

    pub fn moved(&mut self, contact: Contact, x: f32, y: f32) -> Option<RawMotion> {
        let index = self.index_of(contact)?;
        let p = &mut self.contacts[index].1;
        p.x = x;
        p.y = y;
        Some(self.batch(ACTION_MOVE))
    }

    pub fn release(&mut self, contact: Contact, x: f32, y: f32) -> Option<RawMotion> {
        let index = self.index_of(contact)?;
        let p = &mut self.contacts[index].1;
        p.x = x;
        p.y = y;
        let motion = self.batch(MotionAction::Up { index }.encode(self.contacts.len()));
        self.contacts.remove(index);
        Some(motion)
    }

    /// Cancels every active contact.
    pub fn cancel(&mut self) -> Option<RawMotion> {
        if self.contacts.is_empty() {
            return None;
        }
        let motion = self.batch(MotionAction::Cancel.encode(self.contacts.len()));
        self.contacts.clear();
        Some(motion)
    }

    pub fn is_pressed(&self, contact: Contact) -> bool {
        self.index_of(contact).is_some()
    }

    fn index_of(&self, contact: Contact) -> Option<usize> {
        self.contacts.iter().position(|(c, _)| *c == contact)
    }

    fn next_id(&self) -> PointerId {
        (0..)
            .find(|id| self.contacts.iter().all(|(_, p)| p.id != *id))
            .unwrap_or_default()
    }

    fn batch(&self, action: i32) -> RawMotion {
        RawMotion::new(action, self.contacts.iter().map(|(_, p)| *p).collect())
    }
}
