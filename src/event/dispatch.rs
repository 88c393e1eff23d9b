//! Event routing
//!
//! Builds the capture → target → bubble sequence for an event and runs a
//! handler over it, honoring stop-propagation. Document-level capture
//! listeners always observe an event before the element it was aimed at.

use super::{ElementId, ElementTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Target,
    Bubble,
}

/// Input modality of a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerDown { modality: Modality, column: u16, row: u16 },
    FocusIn,
    /// `related` is the element about to receive focus, if any
    FocusOut { related: Option<ElementId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: ElementId,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self { kind, target, propagation_stopped: false, default_prevented: false }
    }

    pub fn pointer_down(target: ElementId, modality: Modality, column: u16, row: u16) -> Self {
        Self::new(EventKind::PointerDown { modality, column, row }, target)
    }

    pub fn focus_in(target: ElementId) -> Self {
        Self::new(EventKind::FocusIn, target)
    }

    pub fn focus_out(target: ElementId, related: Option<ElementId>) -> Self {
        Self::new(EventKind::FocusOut { related }, target)
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub phase: Phase,
    pub node: ElementId,
}

impl Dispatch {
    pub fn capture(node: ElementId) -> Self {
        Self { phase: Phase::Capture, node }
    }

    pub fn target(node: ElementId) -> Self {
        Self { phase: Phase::Target, node }
    }

    pub fn bubble(node: ElementId) -> Self {
        Self { phase: Phase::Bubble, node }
    }
}

/// Capture from the document down to the target's parent, the target itself,
/// then bubble back up to the document.
pub fn route(tree: &ElementTree, target: ElementId) -> Vec<Dispatch> {
    let path = tree.path(target);
    let Some((_, ancestors)) = path.split_last() else {
        return Vec::new();
    };

    let mut seq = Vec::with_capacity(ancestors.len() * 2 + 1);
    seq.extend(ancestors.iter().map(|n| Dispatch::capture(*n)));
    seq.push(Dispatch::target(target));
    seq.extend(ancestors.iter().rev().map(|n| Dispatch::bubble(*n)));
    seq
}

/// Runs `handler` over `seq` until propagation is stopped.
/// Returns the dispatch at which propagation stopped, if any.
pub fn run<F>(seq: &[Dispatch], event: &mut DomEvent, mut handler: F) -> Option<Dispatch>
where
    F: FnMut(Dispatch, &mut DomEvent),
{
    for d in seq {
        handler(*d, event);
        if event.propagation_stopped() {
            return Some(*d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FieldId, Panel};
    use ratatui::layout::Rect;

    fn tree() -> ElementTree {
        let mut tree = ElementTree::new(Rect::new(0, 0, 80, 24));
        tree.insert(ElementId::Panel(Panel::Todos), ElementId::Document, Rect::new(0, 0, 40, 20));
        tree.insert(ElementId::Field(FieldId::NewTodo), ElementId::Panel(Panel::Todos), Rect::new(1, 1, 30, 1));
        tree.insert(ElementId::Keyboard, ElementId::Document, Rect::new(10, 14, 50, 10));
        tree.insert(ElementId::Key(0), ElementId::Keyboard, Rect::new(12, 15, 5, 3));
        tree
    }

    #[test]
    fn test_route_orders_capture_target_bubble() {
        let seq = route(&tree(), ElementId::Key(0));
        assert_eq!(
            seq,
            vec![
                Dispatch::capture(ElementId::Document),
                Dispatch::capture(ElementId::Keyboard),
                Dispatch::target(ElementId::Key(0)),
                Dispatch::bubble(ElementId::Keyboard),
                Dispatch::bubble(ElementId::Document),
            ]
        );
    }

    #[test]
    fn test_route_to_document() {
        let seq = route(&tree(), ElementId::Document);
        assert_eq!(seq, vec![Dispatch::target(ElementId::Document)]);
    }

    #[test]
    fn test_stop_propagation_hides_bubble() {
        let seq = route(&tree(), ElementId::Key(0));
        let mut event = DomEvent::pointer_down(ElementId::Key(0), Modality::Mouse, 13, 16);
        let mut seen = Vec::new();

        let stopped = run(&seq, &mut event, |d, ev| {
            seen.push(d);
            if d.phase == Phase::Target {
                ev.stop_propagation();
                ev.prevent_default();
            }
        });

        assert_eq!(stopped, Some(Dispatch::target(ElementId::Key(0))));
        assert_eq!(seen.first(), Some(&Dispatch::capture(ElementId::Document)));
        assert!(!seen.contains(&Dispatch::bubble(ElementId::Document)));
        assert!(event.default_prevented());
    }

    #[test]
    fn test_capture_listener_runs_even_when_target_stops() {
        let seq = route(&tree(), ElementId::Field(FieldId::NewTodo));
        let mut event = DomEvent::pointer_down(ElementId::Field(FieldId::NewTodo), Modality::Touch, 2, 1);
        let mut order = Vec::new();

        run(&seq, &mut event, |d, ev| {
            order.push(d.phase);
            if d.phase == Phase::Target {
                ev.stop_propagation();
            }
        });

        assert_eq!(order, vec![Phase::Capture, Phase::Capture, Phase::Target]);
    }
}
