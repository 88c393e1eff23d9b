//! Layout helpers and common rendering utilities

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// Fixed sized rect centered in `r`. `reserve_bars` keeps the two bottom
/// rows (help bar and status line) out of the centering.
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect, reserve_bars: bool) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let available_height = if reserve_bars { r.height.saturating_sub(2) } else { r.height };
    let remainder = (available_height.saturating_sub(height)) % 2;
    let adjusted_height = height + remainder;
    let y = r.y + (available_height.saturating_sub(adjusted_height)) / 2;
    Rect::new(x, y, width.min(r.width), adjusted_height.min(r.height))
}

pub fn create_popup_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black))
}

/// Dashboard panel frame. The active panel gets a brighter border.
pub fn create_panel_block(title: &str, active: bool) -> Block<'_> {
    let border = if active { Color::Magenta } else { Color::DarkGray };
    Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn render_empty_message(area: Rect, buf: &mut Buffer, msg: &str) {
    Paragraph::new(msg)
        .style(Style::default().fg(Color::DarkGray))
        .render(area, buf);
}

pub fn render_separator_line(buf: &mut Buffer, x: u16, y: u16, width: u16) {
    for px in x..x + width {
        buf.set_string(px, y, "─", Style::default().fg(Color::DarkGray));
    }
}

pub fn highlight_row(buf: &mut Buffer, x: u16, y: u16, width: u16) {
    for px in x..x + width {
        if let Some(cell) = buf.cell_mut((px, y)) {
            cell.set_bg(Color::DarkGray);
        }
    }
}

pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Renders `text` centered on row `y` of `area`
pub fn render_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let width = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_stringn(x, y, text, area.width as usize, style);
}
