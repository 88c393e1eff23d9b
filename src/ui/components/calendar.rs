//! Month calendar with per-day due counts

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::db::Todo;

use super::layout::render_centered;

const CELL_WIDTH: u16 = 5;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const HEIGHT: u16 = 8 + 2;

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let month = first_of_month(month);
    let shifted = if delta >= 0 {
        month.checked_add_months(Months::new(delta as u32))
    } else {
        month.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(month)
}

/// Whole weeks covering `month`, Sunday first. Days outside the month are `None`.
pub fn month_grid(month: NaiveDate) -> Vec<Option<NaiveDate>> {
    let first = first_of_month(month);
    let lead = first.weekday().num_days_from_sunday() as i64;
    let days = (shift_month(first, 1) - first).num_days();
    let cells = ((lead + days + 6) / 7) * 7;

    (0..cells)
        .map(|i| {
            let day = i - lead;
            (0..days).contains(&day).then(|| first + Duration::days(day))
        })
        .collect()
}

pub fn due_counts(todos: &[Todo]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for todo in todos {
        *counts.entry(todo.due_local_date()).or_insert(0) += 1;
    }
    counts
}

pub struct CalendarView<'a> {
    pub month: NaiveDate,
    pub today: NaiveDate,
    pub todos: &'a [Todo],
}

impl CalendarView<'_> {
    /// Previous / next month buttons on the header row
    pub fn nav_areas(inner: Rect) -> (Rect, Rect) {
        let prev = Rect::new(inner.x, inner.y, 3, 1);
        let next = Rect::new((inner.x + inner.width).saturating_sub(3), inner.y, 3, 1);
        (prev, next)
    }
}

impl Widget for CalendarView<'_> {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        let nav = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let (prev, next) = Self::nav_areas(inner);
        buf.set_string(prev.x, prev.y, " ‹ ", nav);
        buf.set_string(next.x, next.y, " › ", nav);

        let title = self.month.format("%B %Y").to_string();
        render_centered(buf, inner, inner.y, &title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

        let grid_width = CELL_WIDTH * 7;
        let x0 = inner.x + inner.width.saturating_sub(grid_width) / 2;
        let bottom = inner.y + inner.height;

        if inner.y + 1 < bottom {
            for (i, day) in WEEKDAYS.iter().enumerate() {
                buf.set_string(x0 + i as u16 * CELL_WIDTH + 1, inner.y + 1, day, Style::default().fg(Color::DarkGray));
            }
        }

        let counts = due_counts(self.todos);
        for (i, cell) in month_grid(self.month).into_iter().enumerate() {
            let y = inner.y + 2 + (i / 7) as u16;
            if y >= bottom {
                break;
            }
            let Some(date) = cell else { continue };
            let x = x0 + (i % 7) as u16 * CELL_WIDTH;

            let style = if date == self.today {
                Style::default().fg(Color::Black).bg(Color::Magenta)
            } else {
                Style::default().fg(Color::White)
            };
            buf.set_string(x, y, format!("{:>3}", date.day()), style);

            if let Some(count) = counts.get(&date) {
                let badge = if *count > 9 { "+".to_string() } else { count.to_string() };
                buf.set_string(x + 3, y, badge, Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD));
            }
        }
    }
}
