//! Focus Registry
//!
//! Shared slot holding the text field the on-screen keyboard types into.
//! The registry is an explicit handle passed to whoever needs it; clones share
//! the same slot. Every `set` bumps a revision so watchers can tell a new
//! snapshot from the old one even when the contents compare equal.

use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{ElementId, FieldId};

/// Snapshot of an editable field. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub field: FieldId,
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl FocusTarget {
    pub fn new(field: FieldId, value: impl Into<String>, selection_start: usize, selection_end: usize) -> Self {
        Self { field, value: value.into(), selection_start, selection_end }
    }

    /// Collapsed caret at `pos`
    pub fn caret(field: FieldId, value: impl Into<String>, pos: usize) -> Self {
        Self::new(field, value, pos, pos)
    }

    pub fn element(&self) -> ElementId {
        ElementId::Field(self.field)
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Selection clamped to the value and ordered low to high
    pub fn selection(&self) -> (usize, usize) {
        let len = self.len();
        let a = self.selection_start.min(len);
        let b = self.selection_end.min(len);
        (a.min(b), a.max(b))
    }

    pub fn is_collapsed(&self) -> bool {
        let (start, end) = self.selection();
        start == end
    }
}

#[derive(Debug, Default)]
struct Slot {
    target: Option<FocusTarget>,
    revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FocusRegistry {
    slot: Rc<RefCell<Slot>>,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<FocusTarget> {
        self.slot.borrow().target.clone()
    }

    pub fn engaged_field(&self) -> Option<FieldId> {
        self.slot.borrow().target.as_ref().map(|t| t.field)
    }

    pub fn is_engaged(&self) -> bool {
        self.slot.borrow().target.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.slot.borrow().revision
    }

    /// Replaces the current target unconditionally
    pub fn set(&self, target: Option<FocusTarget>) {
        let mut slot = self.slot.borrow_mut();
        tracing::trace!(field = ?target.as_ref().map(|t| t.field), "focus registry set");
        slot.target = target;
        slot.revision = slot.revision.wrapping_add(1);
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn watch(&self) -> FocusWatcher {
        FocusWatcher { registry: self.clone(), seen: self.revision() }
    }
}

/// Observes registry changes once per revision
#[derive(Debug)]
pub struct FocusWatcher {
    registry: FocusRegistry,
    seen: u64,
}

impl FocusWatcher {
    /// `Some(latest)` if the registry was set since the last call
    pub fn changed(&mut self) -> Option<Option<FocusTarget>> {
        let revision = self.registry.revision();
        if revision == self.seen {
            return None;
        }
        self.seen = revision;
        Some(self.registry.get())
    }
}
