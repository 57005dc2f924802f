//! Active-object selection and the single-slot clipboard.
//!
//! Both hold ids or copies, never references into the scene: the scene owns
//! every object, and a selection can go stale when an object is removed or a
//! snapshot is restored. `Selection::retain` drops such a stale id; the
//! session calls it after removals and restorations.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::doc::{ObjectId, SceneObject};

/// Zero or one active object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<ObjectId>,
}

impl Selection {
    #[must_use]
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    pub fn set(&mut self, id: ObjectId) {
        self.active = Some(id);
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Clear the selection if it refers to an object `exists` rejects.
    /// Returns true when the selection changed.
    pub fn retain(&mut self, exists: impl Fn(&ObjectId) -> bool) -> bool {
        match self.active {
            Some(id) if !exists(&id) => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

/// Holds at most one object copied for a later paste.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    item: Option<SceneObject>,
}

impl Clipboard {
    /// Store an independent copy of `obj`, replacing any previous content.
    pub fn store(&mut self, obj: &SceneObject) {
        self.item = Some(obj.duplicate());
    }

    /// Produce a new object from the clipboard, shifted by `offset` on both axes.
    ///
    /// The clipboard advances to the produced copy, so repeated pastes cascade
    /// instead of stacking on the same spot.
    pub fn materialize(&mut self, offset: f64) -> Option<SceneObject> {
        let stored = self.item.as_ref()?;
        let mut obj = stored.duplicate();
        obj.transform.left += offset;
        obj.transform.top += offset;
        self.item = Some(obj.duplicate());
        Some(obj)
    }
}
