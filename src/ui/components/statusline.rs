//! Status Line Component
//!
//! Displays mode indicator, messages, the signed-in user, chips for
//! minimized widgets and the blackout and sign-out buttons.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::event::Panel;
use crate::input::InputMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

pub fn chip_label(panel: Panel) -> &'static str {
    match panel {
        Panel::Todos => " ☰ todos ",
        Panel::Calendar => " ▦ calendar ",
        Panel::DateTime => " ◷ clock ",
        Panel::Weather => " ☁ weather ",
        Panel::Prices => " $ prices ",
        Panel::StatusBar => "",
    }
}

/// Fixed buttons at the right end of the bar while signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Blackout,
    Logout,
}

impl StatusAction {
    pub const ALL: [StatusAction; 2] = [Self::Blackout, Self::Logout];

    pub fn label(self) -> &'static str {
        match self {
            Self::Blackout => " ◐ off ",
            Self::Logout => " ⏻ sign out ",
        }
    }
}

pub struct StatusLine<'a> {
    mode: InputMode,
    message: Option<(&'a str, MessageType)>,
    user: Option<&'a str>,
    minimized: &'a [Panel],
}

impl<'a> StatusLine<'a> {
    pub fn new(mode: InputMode) -> Self {
        Self { mode, message: None, user: None, minimized: &[] }
    }

    pub fn message(mut self, msg: &'a str, msg_type: MessageType) -> Self {
        self.message = Some((msg, msg_type));
        self
    }

    pub fn user(mut self, name: &'a str) -> Self {
        self.user = Some(name);
        self
    }

    pub fn minimized(mut self, panels: &'a [Panel]) -> Self {
        self.minimized = panels;
        self
    }

    /// Right-aligned action buttons. Buttons that do not fit are dropped from the left.
    pub fn action_areas(area: Rect) -> Vec<(StatusAction, Rect)> {
        let mut right = area.x + area.width;
        let mut areas = Vec::with_capacity(StatusAction::ALL.len());
        for action in StatusAction::ALL.iter().rev() {
            let w = action.label().chars().count() as u16;
            if right < area.x + w {
                break;
            }
            right -= w;
            areas.push((*action, Rect::new(right, area.y, w, 1)));
        }
        areas.reverse();
        areas
    }

    /// Space left of the action buttons, where restore chips go
    pub fn chip_region(area: Rect) -> Rect {
        let left = Self::action_areas(area).first().map_or(area.x + area.width, |(_, r)| r.x);
        Rect::new(area.x, area.y, left.saturating_sub(area.x + 1), area.height)
    }

    /// Right-aligned restore chips, in the order given
    pub fn chip_areas(area: Rect, panels: &[Panel]) -> Vec<(Panel, Rect)> {
        let mut right = area.x + area.width;
        let mut areas = Vec::with_capacity(panels.len());
        for panel in panels.iter().rev() {
            let w = chip_label(*panel).chars().count() as u16;
            if right < area.x + w + 1 {
                break;
            }
            right -= w;
            areas.push((*panel, Rect::new(right, area.y, w, 1)));
            right -= 1;
        }
        areas.reverse();
        areas
    }
}

fn mode_style(mode: InputMode) -> Style {
    let base = Style::default().fg(Color::Black);
    match mode {
        InputMode::Normal => base.bg(Color::Magenta),
        InputMode::Insert => base.bg(Color::Blue),
        InputMode::Confirm => base.bg(Color::Red),
        InputMode::Login => base.bg(Color::Green),
    }
}

fn render_mode_indicator(buf: &mut Buffer, area: Rect, mode: InputMode) -> u16 {
    let style = mode_style(mode).add_modifier(Modifier::BOLD);
    let mode_text = format!(" {} ", mode.indicator());
    buf.set_string(area.x, area.y, &mode_text, style);
    mode_text.len() as u16
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Color::DarkGray));

        let mode_width = render_mode_indicator(buf, area, self.mode);
        let x = area.x + mode_width + 1;

        let chip_region = match self.user {
            Some(_) => {
                for (action, rect) in Self::action_areas(area) {
                    let style = Style::default().fg(Color::Black).bg(Color::Cyan);
                    buf.set_string(rect.x, rect.y, action.label(), style);
                }
                Self::chip_region(area)
            }
            None => area,
        };

        let chips = Self::chip_areas(chip_region, self.minimized);
        let chips_x = chips.first().map_or(chip_region.x + chip_region.width, |(_, r)| r.x);
        for (panel, rect) in &chips {
            let style = Style::default().fg(Color::Black).bg(Color::Gray);
            buf.set_string(rect.x, rect.y, chip_label(*panel), style);
        }

        let mut right = chips_x;
        if let Some(user) = self.user {
            let label = format!(" {} ", user);
            let w = label.chars().count() as u16;
            if right >= x + w {
                right -= w;
                buf.set_string(right, area.y, &label, Style::default().fg(Color::Cyan).bg(Color::DarkGray));
            }
        }

        if let Some((msg, msg_type)) = self.message {
            let max = right.saturating_sub(x + 1) as usize;
            buf.set_stringn(x, area.y, msg, max, Style::default().bg(Color::DarkGray).fg(msg_type.color()));
        }
    }
}

pub struct HelpBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> HelpBar<'a> {
    pub fn for_mode(mode: InputMode) -> Self {
        Self { hints: hints_for_mode(mode) }
    }
}

fn hints_for_mode(mode: InputMode) -> Vec<(&'static str, &'static str)> {
    match mode {
        InputMode::Normal => vec![
            ("a", "add"),
            ("e", "edit"),
            ("space", "done"),
            ("dd", "delete"),
            ("[/]", "month"),
            ("1-3", "price"),
            ("w/c/t/p/T", "widgets"),
            ("b", "blank"),
            ("L", "sign out"),
            ("q", "quit"),
        ],
        InputMode::Insert => vec![
            ("esc", "blur"),
            ("tab/shift+tab", "next/prev field"),
            ("enter", "save"),
            ("alt+enter", "newline"),
            ("click keys", "type"),
        ],
        InputMode::Confirm => vec![
            ("y", "yes"),
            ("n", "no"),
        ],
        InputMode::Login => vec![
            ("enter", "sign in"),
            ("esc", "blur"),
        ],
    }
}

fn build_hint_spans<'a>(hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
    }

    spans
}

impl<'a> Widget for HelpBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans = build_hint_spans(&self.hints);
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chips_right_aligned() {
        let area = Rect::new(0, 10, 80, 1);
        let chips = StatusLine::chip_areas(area, &[Panel::Weather, Panel::Prices]);
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].0, Panel::Weather);
        let (_, last) = chips[1];
        assert_eq!(last.x + last.width, 80);
        assert!(chips[0].1.x + chips[0].1.width < last.x);
    }

    #[test]
    fn test_chips_dropped_when_narrow() {
        let area = Rect::new(0, 0, 12, 1);
        let chips = StatusLine::chip_areas(area, &[Panel::Calendar, Panel::Prices]);
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].0, Panel::Prices);
    }

    #[test]
    fn test_actions_sit_right_of_chips() {
        let area = Rect::new(0, 0, 80, 1);
        let actions = StatusLine::action_areas(area);
        assert_eq!(actions.iter().map(|(a, _)| *a).collect::<Vec<_>>(), StatusAction::ALL.to_vec());
        let (_, logout) = actions[1];
        assert_eq!(logout.x + logout.width, 80);

        let region = StatusLine::chip_region(area);
        let chips = StatusLine::chip_areas(region, &[Panel::Weather]);
        assert!(chips[0].1.x + chips[0].1.width < actions[0].1.x);
    }

    #[test]
    fn test_actions_only_drawn_when_signed_in() {
        let area = Rect::new(0, 0, 60, 1);
        let (_, logout) = StatusLine::action_areas(area)[1];

        let mut buf = Buffer::empty(area);
        StatusLine::new(InputMode::Normal).render(area, &mut buf);
        assert_ne!(buf[(logout.x + 1, 0)].symbol(), "⏻");

        let mut buf = Buffer::empty(area);
        StatusLine::new(InputMode::Normal).user("kim").render(area, &mut buf);
        assert_eq!(buf[(logout.x + 1, 0)].symbol(), "⏻");
    }

    #[test]
    fn test_message_rendered_after_mode() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusLine::new(InputMode::Normal).message("Saved", MessageType::Success).render(area, &mut buf);
        assert_eq!(buf[(9, 0)].symbol(), "S");
        assert_eq!(buf[(9, 0)].fg, Color::Green);
    }
}
