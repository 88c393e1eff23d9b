//! Dialog popups (confirm, sign in)

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use crate::input::TextBuffer;

use super::input_field::InputField;
use super::layout::{centered_rect_fixed, create_popup_block};

pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self { title, message }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = centered_rect_fixed(50, 6, area, true);
        Clear.render(popup_area, buf);

        let block = create_popup_block(self.title, Color::Yellow);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        Paragraph::new(self.message)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .render(Rect::new(inner.x, inner.y, inner.width, 2), buf);

        render_confirm_hint(buf, inner.x, inner.y + 3);
    }
}

fn render_confirm_hint(buf: &mut Buffer, x: u16, y: u16) {
    let hint = Line::from(vec![
        Span::styled("[y]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" Yes  "),
        Span::styled("[n]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" No"),
    ]);
    buf.set_line(x, y, &hint, 20);
}

const LOGIN_WIDTH: u16 = 44;
const LOGIN_HEIGHT: u16 = 7;

pub struct LoginDialog<'a> {
    name: &'a TextBuffer,
    focused: bool,
    error: Option<&'a str>,
}

impl<'a> LoginDialog<'a> {
    pub fn new(name: &'a TextBuffer, focused: bool) -> Self {
        Self { name, focused, error: None }
    }

    pub fn error(mut self, err: &'a str) -> Self {
        self.error = Some(err);
        self
    }

    /// Popup placement. The top half of `area` keeps room for the keyboard below.
    pub fn area(area: Rect) -> Rect {
        let top = Rect::new(area.x, area.y, area.width, area.height / 2 + LOGIN_HEIGHT / 2);
        centered_rect_fixed(LOGIN_WIDTH, LOGIN_HEIGHT, top, false)
    }

    /// Name field inside the popup, label row included
    pub fn field_area(popup: Rect) -> Rect {
        let inner = create_popup_block("", Color::Magenta).inner(popup);
        Rect::new(inner.x, inner.y + 1, inner.width, InputField::height(true)).intersection(inner)
    }
}

impl Widget for LoginDialog<'_> {
    fn render(self, popup_area: Rect, buf: &mut Buffer) {
        Clear.render(popup_area, buf);

        let block = create_popup_block(" Sign in ", Color::Magenta);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        buf.set_stringn(inner.x, inner.y, "Who is using the dashboard?", inner.width as usize, Style::default().fg(Color::White));

        InputField::new("Name", self.name)
            .placeholder("your name")
            .focused(self.focused)
            .style(Style::default().fg(Color::Yellow))
            .render(Self::field_area(popup_area), buf);

        if let Some(err) = self.error {
            buf.set_stringn(inner.x, inner.y + 4, err, inner.width as usize, Style::default().fg(Color::Red));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_field_inside_popup() {
        let popup = LoginDialog::area(Rect::new(0, 0, 100, 40));
        let field = LoginDialog::field_area(popup);
        assert_eq!(popup.intersection(field), field);
        assert_eq!(field.height, 2);
    }
}
