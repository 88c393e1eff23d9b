//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::input::TextBuffer;

const NEWLINE_GLYPH: char = '⏎';

pub struct InputField<'a> {
    label: Option<&'a str>,
    value: &'a str,
    cursor: usize,
    selection: (usize, usize),
    focused: bool,
    placeholder: &'a str,
    style: Style,
}

impl<'a> InputField<'a> {
    pub fn new(label: &'a str, buffer: &'a TextBuffer) -> Self {
        Self {
            label: Some(label),
            value: buffer.content(),
            cursor: buffer.cursor(),
            selection: buffer.selection(),
            focused: false,
            placeholder: "",
            style: Style::default().fg(Color::White),
        }
    }

    /// Field without a label row
    pub fn bare(buffer: &'a TextBuffer) -> Self {
        Self { label: None, ..Self::new("", buffer) }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Height the widget needs
    pub fn height(labelled: bool) -> u16 {
        if labelled { 2 } else { 1 }
    }

    /// Row holding the editable text
    pub fn input_row(area: Rect, labelled: bool) -> Rect {
        let y = if labelled { area.y + 1 } else { area.y };
        Rect::new(area.x, y, area.width, 1)
    }
}

/// First visible character so the caret stays on screen
pub fn scroll_offset(cursor: usize, width: usize) -> usize {
    cursor.saturating_sub(width.saturating_sub(1))
}

/// Character index under `column`, counted from the input row's left edge
pub fn index_at_column(buffer: &TextBuffer, width: usize, column: usize) -> usize {
    (scroll_offset(buffer.cursor(), width) + column).min(buffer.len())
}

impl Widget for InputField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(label) = self.label {
            let color = if self.focused { Color::Magenta } else { Color::Cyan };
            buf.set_stringn(area.x, area.y, label, area.width as usize, Style::default().fg(color));
        }
        let row = Self::input_row(area, self.label.is_some());
        if row.y >= area.y + area.height {
            return;
        }

        render_input_background(buf, row.x, row.y, row.width, self.focused);
        if self.value.is_empty() && !self.placeholder.is_empty() {
            buf.set_stringn(row.x, row.y, self.placeholder, row.width as usize, Style::default().fg(Color::Gray).bg(Color::DarkGray));
        } else {
            render_input_value(buf, row, self.value, self.cursor, self.selection, self.style);
        }
        if self.focused {
            render_input_cursor(buf, row, self.cursor);
        }
    }
}

fn render_input_background(buf: &mut Buffer, x: u16, y: u16, width: u16, focused: bool) {
    let bg = if focused { Color::Rgb(48, 48, 64) } else { Color::DarkGray };
    for px in x..x + width {
        if let Some(cell) = buf.cell_mut((px, y)) {
            cell.set_bg(bg);
        }
    }
}

fn render_input_value(buf: &mut Buffer, row: Rect, value: &str, cursor: usize, selection: (usize, usize), style: Style) {
    let width = row.width as usize;
    let skip = scroll_offset(cursor, width);
    let (sel_start, sel_end) = selection;

    for (i, c) in value.chars().enumerate().skip(skip).take(width) {
        let shown = if c == '\n' { NEWLINE_GLYPH } else { c };
        let style = if i >= sel_start && i < sel_end { style.bg(Color::Blue) } else { style };
        let x = row.x + (i - skip) as u16;
        buf.set_string(x, row.y, shown.to_string(), style);
    }
}

fn render_input_cursor(buf: &mut Buffer, row: Rect, cursor: usize) {
    let width = row.width as usize;
    let cursor_x = row.x + (cursor - scroll_offset(cursor, width)) as u16;
    if cursor_x >= row.x + row.width {
        return;
    }
    if let Some(cell) = buf.cell_mut((cursor_x, row.y)) {
        cell.set_style(Style::default().bg(Color::White).fg(Color::Black));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_caret_visible() {
        assert_eq!(scroll_offset(3, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(15, 10), 6);
    }

    #[test]
    fn test_index_at_column_clamps() {
        let buffer = TextBuffer::with_content("hello");
        assert_eq!(index_at_column(&buffer, 20, 2), 2);
        assert_eq!(index_at_column(&buffer, 20, 12), 5);
    }

    #[test]
    fn test_render_shows_value_and_label() {
        let buffer = TextBuffer::with_content("milk");
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        InputField::new("New", &buffer).focused(true).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "N");
        assert_eq!(buf[(0, 1)].symbol(), "m");
        assert_eq!(buf[(4, 1)].bg, Color::White);
    }
}
