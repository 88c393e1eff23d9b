//! Element tree rebuilt on every frame for hit testing and ancestry checks

use std::collections::HashMap;

use ratatui::layout::Rect;

use super::ElementId;

#[derive(Debug, Clone, Copy)]
struct ElementNode {
    parent: Option<ElementId>,
    area: Rect,
}

/// Rendered elements, in paint order. Later insertions are on top.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: HashMap<ElementId, ElementNode>,
    paint_order: Vec<ElementId>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl ElementTree {
    pub fn new(area: Rect) -> Self {
        let mut tree = Self { nodes: HashMap::new(), paint_order: Vec::new() };
        tree.reset(area);
        tree
    }

    /// Drops every element except the document root
    pub fn reset(&mut self, area: Rect) {
        self.nodes.clear();
        self.paint_order.clear();
        self.nodes.insert(ElementId::Document, ElementNode { parent: None, area });
    }

    /// Registers an element under `parent`. Re-inserting an id moves it to the top.
    pub fn insert(&mut self, id: ElementId, parent: ElementId, area: Rect) {
        if id == ElementId::Document {
            return;
        }
        self.paint_order.retain(|e| *e != id);
        self.paint_order.push(id);
        self.nodes.insert(id, ElementNode { parent: Some(parent), area });
    }

    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn area(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(&id).map(|n| n.area)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// True when `node` is `ancestor` or lies anywhere below it
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            current = self.parent(id);
        }
        false
    }

    /// Root-to-target path. Unknown ids resolve to `[Document, id]`.
    pub fn path(&self, target: ElementId) -> Vec<ElementId> {
        if target == ElementId::Document {
            return vec![ElementId::Document];
        }
        if !self.is_mounted(target) {
            return vec![ElementId::Document, target];
        }

        let mut path = vec![target];
        let mut current = self.parent(target);
        while let Some(id) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(id);
            current = self.parent(id);
        }
        if path.last() != Some(&ElementId::Document) {
            path.push(ElementId::Document);
        }
        path.reverse();
        path
    }

    /// Topmost element under the cell, or the document when nothing matches
    pub fn hit_test(&self, column: u16, row: u16) -> ElementId {
        self.paint_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.area(*id).is_some_and(|a| rect_contains(a, column, row)))
            .unwrap_or(ElementId::Document)
    }
}

fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && row >= area.y
        && column < area.x.saturating_add(area.width)
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FieldId, Panel};

    fn sample_tree() -> ElementTree {
        let mut tree = ElementTree::new(Rect::new(0, 0, 80, 24));
        tree.insert(ElementId::Panel(Panel::Todos), ElementId::Document, Rect::new(0, 0, 40, 20));
        tree.insert(ElementId::Field(FieldId::NewTodo), ElementId::Panel(Panel::Todos), Rect::new(1, 1, 30, 1));
        tree.insert(ElementId::Keyboard, ElementId::Document, Rect::new(10, 14, 50, 10));
        tree.insert(ElementId::Key(3), ElementId::Keyboard, Rect::new(12, 15, 5, 3));
        tree
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let tree = sample_tree();
        // Keyboard overlaps the todo panel and was painted later
        assert_eq!(tree.hit_test(13, 16), ElementId::Key(3));
        assert_eq!(tree.hit_test(11, 14), ElementId::Keyboard);
        assert_eq!(tree.hit_test(2, 1), ElementId::Field(FieldId::NewTodo));
        assert_eq!(tree.hit_test(70, 2), ElementId::Document);
    }

    #[test]
    fn test_contains_walks_ancestors() {
        let tree = sample_tree();
        assert!(tree.contains(ElementId::Keyboard, ElementId::Key(3)));
        assert!(tree.contains(ElementId::Keyboard, ElementId::Keyboard));
        assert!(!tree.contains(ElementId::Keyboard, ElementId::Field(FieldId::NewTodo)));
        assert!(tree.contains(ElementId::Document, ElementId::Field(FieldId::NewTodo)));
    }

    #[test]
    fn test_path_from_root() {
        let tree = sample_tree();
        assert_eq!(
            tree.path(ElementId::Key(3)),
            vec![ElementId::Document, ElementId::Keyboard, ElementId::Key(3)]
        );
        assert_eq!(tree.path(ElementId::Document), vec![ElementId::Document]);
    }
}
