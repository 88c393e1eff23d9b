//! Weather panel: current conditions and the daily forecast strip

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::remote::{WeatherData, WeatherReport};

const DAY_WIDTH: u16 = 8;

pub const HEIGHT: u16 = 6 + 2;

#[derive(Clone, Copy)]
pub struct WeatherView<'a> {
    pub report: Option<&'a WeatherReport>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub city: &'a str,
}

impl Widget for WeatherView<'_> {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        if let Some(err) = self.error {
            Paragraph::new(err)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let Some(report) = self.report else {
            let msg = if self.loading { "Loading weather…" } else { "No weather data" };
            buf.set_stringn(inner.x, inner.y, msg, inner.width as usize, Style::default().fg(Color::DarkGray));
            return;
        };

        render_current(buf, inner, &report.current, self.city);
        if inner.height >= 5 {
            let strip = Rect::new(inner.x, inner.y + 3, inner.width, inner.height - 3);
            render_forecast(buf, strip, &report.forecast);
        }
    }
}

fn render_current(buf: &mut Buffer, inner: Rect, now: &WeatherData, city: &str) {
    let headline = format!("{} {}°F  {}", now.glyph(), now.temp, now.description);
    buf.set_stringn(inner.x, inner.y, headline, inner.width as usize, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    if inner.height < 2 {
        return;
    }
    let details = format!("{}  ·  humidity {}%  ·  wind {} mph", city, now.humidity, now.wind_speed);
    buf.set_stringn(inner.x, inner.y + 1, details, inner.width as usize, Style::default().fg(Color::Gray));
}

fn render_forecast(buf: &mut Buffer, strip: Rect, days: &[WeatherData]) {
    let fits = (strip.width / DAY_WIDTH) as usize;
    for (i, day) in days.iter().take(fits).enumerate() {
        let x = strip.x + i as u16 * DAY_WIDTH;
        buf.set_string(x, strip.y, &day.date, Style::default().fg(Color::Cyan));
        buf.set_string(x, strip.y + 1, day.glyph(), Style::default());
        if strip.height > 2 {
            buf.set_string(x, strip.y + 2, format!("{}°", day.temp), Style::default().fg(Color::White));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(label: &str, temp: i64) -> WeatherData {
        WeatherData {
            date: label.into(),
            temp,
            description: "few clouds".into(),
            icon: "02d".into(),
            humidity: 30,
            wind_speed: 6,
        }
    }

    fn text_of(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_error_is_shown_inline() {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        WeatherView { report: None, loading: false, error: Some("Weather API key is not configured"), city: "West Covina" }
            .render(area, &mut buf);
        assert!(text_of(&buf, 0).starts_with("Weather API key"));
    }

    #[test]
    fn test_forecast_strip() {
        let report = WeatherReport { current: day("Now", 71), forecast: vec![day("Fri", 70), day("Sat", 68)] };
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        WeatherView { report: Some(&report), loading: false, error: None, city: "West Covina" }.render(area, &mut buf);

        assert!(text_of(&buf, 3).starts_with("Fri"));
        assert!(text_of(&buf, 1).contains("humidity 30%"));
    }
}
