//! List selection and scroll state

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

#[derive(Debug, Default, Clone)]
pub struct ListViewState {
    selected: Option<usize>,
    offset: usize,
    total: usize,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Keeps the selection in range when the list changes size
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.selected = match (self.selected, total) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), n) => Some(i.min(n - 1)),
        };
        self.offset = self.offset.min(total.saturating_sub(1));
    }

    pub fn select(&mut self, index: usize) {
        if index < self.total {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        let Some(i) = self.selected else { return };
        self.select((i + 1).min(self.total.saturating_sub(1)));
    }

    pub fn select_prev(&mut self) {
        let Some(i) = self.selected else { return };
        self.select(i.saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.select(0);
    }

    pub fn select_last(&mut self) {
        self.select(self.total.saturating_sub(1));
    }

    /// Scrolls so the selection is within `visible` items
    pub fn ensure_visible(&mut self, visible: usize) {
        let Some(i) = self.selected else {
            self.offset = 0;
            return;
        };
        if visible == 0 {
            return;
        }
        if i < self.offset {
            self.offset = i;
        } else if i >= self.offset + visible {
            self.offset = i + 1 - visible;
        }
    }
}

/// Up/down arrows on the bottom border when more items are off screen
pub fn render_v_scroll_indicator(buf: &mut Buffer, area: &Rect, offset: usize, visible: usize, total: usize) {
    if total <= visible {
        return;
    }
    let up = offset > 0;
    let down = offset + visible < total;
    let icon = match (up, down) {
        (true, true) => "▲▼",
        (true, false) => "▲ ",
        _ => " ▼",
    };
    let x = area.x + area.width.saturating_sub(4);
    let y = area.y + area.height.saturating_sub(1);
    buf.set_string(x, y, icon, Style::default().fg(Color::DarkGray));
}
