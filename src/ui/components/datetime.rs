//! Clock widget

use chrono::{DateTime, TimeZone};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::layout::render_centered;

pub const HEIGHT: u16 = 2 + 2;

pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%I:%M:%S %p").to_string()
}

pub fn format_long_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %-d, %Y").to_string()
}

pub struct DateTimeView {
    pub time: String,
    pub date: String,
}

impl DateTimeView {
    pub fn new<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self { time: format_time(now), date: format_long_date(now) }
    }
}

impl Widget for DateTimeView {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        render_centered(buf, inner, inner.y, &self.time, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        if inner.height > 1 {
            render_centered(buf, inner, inner.y + 1, &self.date, Style::default().fg(Color::Gray));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_formats() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 5).unwrap();
        assert_eq!(format_time(&at), "03:04:05 PM");
        assert_eq!(format_long_date(&at), "Friday, October 16, 2026");
    }
}
