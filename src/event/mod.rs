//! Element Events
//!
//! Element identities, the per-frame element tree, and capture/target/bubble
//! routing for pointer and focus events.

pub mod dispatch;
pub mod tree;

pub use dispatch::{route, run, Dispatch, DomEvent, EventKind, Modality, Phase};
pub use tree::ElementTree;

/// Text fields that can hold native focus and receive injected keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    NewTodo,
    DueDate,
    EditTodo,
    Login,
}

impl FieldId {
    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::EditTodo)
    }
}

/// Top-level dashboard regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Todos,
    Calendar,
    DateTime,
    Weather,
    Prices,
    StatusBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Document,
    Panel(Panel),
    Field(FieldId),
    TodoRow(usize),
    TodoCheckbox(usize),
    TodoEdit(usize),
    TodoDelete(usize),
    /// Submits the create form
    AddTodo,
    MonthPrev,
    MonthNext,
    Asset(usize),
    /// Minimize/restore chip for a widget in the status bar
    Toggle(Panel),
    Logout,
    /// Blackout on/off
    OffScreen,
    Keyboard,
    Key(usize),
}

impl ElementId {
    pub fn field(&self) -> Option<FieldId> {
        match self {
            Self::Field(f) => Some(*f),
            _ => None,
        }
    }
}
