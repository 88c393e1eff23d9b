//! On-screen keyboard panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Widget},
};

use crate::keyboard::KeyboardSurface;

use super::layout::{create_popup_block, render_centered};

pub struct KeyboardView<'a> {
    surface: &'a KeyboardSurface,
    title: &'a str,
}

impl<'a> KeyboardView<'a> {
    pub fn new(surface: &'a KeyboardSurface, title: &'a str) -> Self {
        Self { surface, title }
    }

    /// Outer size including the border
    pub fn size(surface: &KeyboardSurface) -> (u16, u16) {
        let (w, h) = surface.content_size();
        (w + 2, h + 2)
    }

    /// Bottom-centered placement inside `area`
    pub fn area(surface: &KeyboardSurface, area: Rect) -> Rect {
        let (w, h) = Self::size(surface);
        let (w, h) = (w.min(area.width), h.min(area.height));
        let x = area.x + (area.width - w) / 2;
        let y = area.y + area.height - h;
        Rect::new(x, y, w, h)
    }

    pub fn inner(area: Rect) -> Rect {
        create_popup_block("", Color::Magenta).inner(area)
    }
}

impl Widget for KeyboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = create_popup_block(self.title, Color::Magenta);
        let inner = block.inner(area);
        block.render(area, buf);

        let highlighted = self.surface.highlighted();
        for (index, key_area) in self.surface.key_areas(inner) {
            let Some(key) = self.surface.key(index) else { continue };
            let style = if highlighted == Some(index) {
                Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };
            buf.set_style(key_area, style);
            render_centered(buf, key_area, key_area.y, &key.label(), style);
        }
    }
}
