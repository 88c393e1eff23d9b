//! Dismissal Controller
//!
//! Engages the on-screen keyboard when a field gains focus and clears the
//! focus registry when focus or a pointer-down lands outside both the engaged
//! field and the keyboard surface.

use crate::event::{Dispatch, DomEvent, ElementId, ElementTree, EventKind, Phase};

use super::focus::{FocusRegistry, FocusTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissalState {
    Idle,
    Engaged,
}

#[derive(Debug, Clone)]
pub struct DismissalController {
    registry: FocusRegistry,
    keyboard_root: ElementId,
}

impl DismissalController {
    pub fn new(registry: FocusRegistry, keyboard_root: ElementId) -> Self {
        Self { registry, keyboard_root }
    }

    pub fn state(&self) -> DismissalState {
        if self.registry.is_engaged() {
            DismissalState::Engaged
        } else {
            DismissalState::Idle
        }
    }

    pub fn on_focus_in(&self, target: FocusTarget) {
        tracing::debug!(field = ?target.field, "keyboard engaged");
        self.registry.set(Some(target));
    }

    /// Dismisses unless focus is moving into the keyboard surface
    pub fn on_focus_out(&self, tree: &ElementTree, related: Option<ElementId>) -> bool {
        if self.state() == DismissalState::Idle {
            return false;
        }
        if related.is_some_and(|r| tree.contains(self.keyboard_root, r)) {
            return false;
        }
        self.dismiss()
    }

    /// Capture-phase pointer-down at the document. `hit` is the element under the pointer.
    pub fn on_pointer_down(&self, tree: &ElementTree, hit: ElementId) -> bool {
        let Some(engaged) = self.registry.get() else {
            return false;
        };
        if tree.contains(self.keyboard_root, hit) || tree.contains(engaged.element(), hit) {
            return false;
        }
        self.dismiss()
    }

    /// Document-level listener entry point for the dispatcher
    pub fn listen(&self, tree: &ElementTree, d: Dispatch, event: &DomEvent) -> bool {
        if d.node != ElementId::Document {
            return false;
        }
        match (event.kind, d.phase) {
            (EventKind::PointerDown { .. }, Phase::Capture | Phase::Target) => {
                self.on_pointer_down(tree, event.target)
            }
            (EventKind::FocusOut { related }, Phase::Target | Phase::Bubble) => {
                self.on_focus_out(tree, related)
            }
            _ => false,
        }
    }

    /// Clears the registry. Idempotent; returns whether anything was engaged.
    pub fn dismiss(&self) -> bool {
        let was_engaged = self.registry.is_engaged();
        if was_engaged {
            tracing::debug!("keyboard dismissed");
        }
        self.registry.clear();
        was_engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{route, run, FieldId, Modality, Panel};
    use ratatui::layout::Rect;

    fn tree() -> ElementTree {
        let mut tree = ElementTree::new(Rect::new(0, 0, 100, 40));
        tree.insert(ElementId::Panel(Panel::Todos), ElementId::Document, Rect::new(0, 0, 40, 20));
        tree.insert(ElementId::Field(FieldId::NewTodo), ElementId::Panel(Panel::Todos), Rect::new(1, 1, 30, 1));
        tree.insert(ElementId::Field(FieldId::DueDate), ElementId::Panel(Panel::Todos), Rect::new(1, 3, 30, 1));
        tree.insert(ElementId::Panel(Panel::Weather), ElementId::Document, Rect::new(50, 0, 40, 10));
        tree.insert(ElementId::Keyboard, ElementId::Document, Rect::new(20, 25, 60, 14));
        tree.insert(ElementId::Key(5), ElementId::Keyboard, Rect::new(22, 26, 5, 3));
        tree
    }

    fn engaged() -> (FocusRegistry, DismissalController) {
        let registry = FocusRegistry::new();
        let controller = DismissalController::new(registry.clone(), ElementId::Keyboard);
        controller.on_focus_in(FocusTarget::caret(FieldId::NewTodo, "", 0));
        (registry, controller)
    }

    fn pointer_down(tree: &ElementTree, controller: &DismissalController, column: u16, row: u16) {
        let hit = tree.hit_test(column, row);
        let mut event = DomEvent::pointer_down(hit, Modality::Mouse, column, row);
        let seq = route(tree, hit);
        run(&seq, &mut event, |d, ev| {
            controller.listen(tree, d, ev);
            // Keys swallow their own activation
            if matches!(d.node, ElementId::Key(_)) && d.phase == Phase::Target {
                ev.stop_propagation();
                ev.prevent_default();
            }
        });
    }

    #[test]
    fn test_focus_in_engages() {
        let (registry, controller) = engaged();
        assert_eq!(controller.state(), DismissalState::Engaged);
        assert_eq!(registry.engaged_field(), Some(FieldId::NewTodo));
    }

    #[test]
    fn test_pointer_down_inside_keyboard_keeps_target() {
        let tree = tree();
        let (registry, controller) = engaged();
        pointer_down(&tree, &controller, 23, 27);
        assert_eq!(registry.engaged_field(), Some(FieldId::NewTodo));

        // Keyboard padding, not a key
        pointer_down(&tree, &controller, 70, 37);
        assert_eq!(registry.engaged_field(), Some(FieldId::NewTodo));
    }

    #[test]
    fn test_pointer_down_inside_engaged_field_keeps_target() {
        let tree = tree();
        let (registry, controller) = engaged();
        pointer_down(&tree, &controller, 5, 1);
        assert!(registry.is_engaged());
    }

    #[test]
    fn test_pointer_down_elsewhere_dismisses() {
        let tree = tree();
        let (registry, controller) = engaged();
        pointer_down(&tree, &controller, 60, 5);
        assert!(registry.get().is_none());
        assert_eq!(controller.state(), DismissalState::Idle);
    }

    #[test]
    fn test_pointer_down_on_bare_document_dismisses() {
        let tree = tree();
        let (registry, controller) = engaged();
        pointer_down(&tree, &controller, 95, 20);
        assert!(!registry.is_engaged());
    }

    #[test]
    fn test_focus_out_to_keyboard_keeps_target() {
        let tree = tree();
        let (registry, controller) = engaged();
        assert!(!controller.on_focus_out(&tree, Some(ElementId::Key(5))));
        assert!(registry.is_engaged());
    }

    #[test]
    fn test_focus_out_elsewhere_dismisses() {
        let tree = tree();
        let (registry, controller) = engaged();
        assert!(controller.on_focus_out(&tree, Some(ElementId::Field(FieldId::DueDate))));
        assert!(!registry.is_engaged());

        let (registry, controller) = engaged();
        assert!(controller.on_focus_out(&tree, None));
        assert!(!registry.is_engaged());
    }

    #[test]
    fn test_signals_ignored_when_idle() {
        let tree = tree();
        let registry = FocusRegistry::new();
        let controller = DismissalController::new(registry.clone(), ElementId::Keyboard);
        assert!(!controller.on_focus_out(&tree, None));
        assert!(!controller.on_pointer_down(&tree, ElementId::Document));
        assert!(!registry.is_engaged());
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let (registry, controller) = engaged();
        assert!(controller.dismiss());
        assert!(registry.get().is_none());
        assert!(!controller.dismiss());
        assert!(registry.get().is_none());
    }
}
