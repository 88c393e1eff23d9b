//! Price panel: asset selector and the selected asset's quote

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::remote::{Quote, ASSETS};

const CHIP_GAP: u16 = 1;

pub const HEIGHT: u16 = 3 + 2;

/// Thousands-separated dollars with two decimals
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

pub fn format_change(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

fn chip_label(index: usize) -> String {
    let asset = ASSETS[index];
    format!(" {} {} ", asset.symbol, asset.name)
}

#[derive(Clone, Copy)]
pub struct PriceView<'a> {
    pub selected: Option<usize>,
    pub quote: Option<&'a Quote>,
    pub loading: bool,
    pub error: Option<&'a str>,
}

impl PriceView<'_> {
    /// Selector chips on the first row, one per asset
    pub fn asset_areas(inner: Rect) -> Vec<(usize, Rect)> {
        let mut x = inner.x;
        let right = inner.x + inner.width;
        let mut areas = Vec::with_capacity(ASSETS.len());
        for index in 0..ASSETS.len() {
            let w = chip_label(index).chars().count() as u16;
            if x + w > right {
                break;
            }
            areas.push((index, Rect::new(x, inner.y, w, 1)));
            x += w + CHIP_GAP;
        }
        areas
    }
}

impl Widget for PriceView<'_> {
    fn render(self, inner: Rect, buf: &mut Buffer) {
        for (index, area) in Self::asset_areas(inner) {
            let style = if self.selected == Some(index) {
                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };
            buf.set_string(area.x, area.y, chip_label(index), style);
        }

        if inner.height < 3 {
            return;
        }
        let y = inner.y + 2;
        let width = inner.width as usize;

        let Some(index) = self.selected else {
            buf.set_stringn(inner.x, y, "Select an asset (1-3)", width, Style::default().fg(Color::DarkGray));
            return;
        };

        let name = ASSETS[index].name;
        match (self.quote, self.loading, self.error) {
            (Some(quote), _, _) => {
                let price = format!("{}  {}", name, format_usd(quote.price));
                buf.set_stringn(inner.x, y, &price, width, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
                let color = if quote.is_up() { Color::Green } else { Color::Red };
                let x = inner.x + price.chars().count() as u16 + 2;
                if x < inner.x + inner.width {
                    let remaining = (inner.x + inner.width - x) as usize;
                    buf.set_stringn(x, y, format_change(quote.change_24h), remaining, Style::default().fg(color));
                }
            }
            (None, true, _) => {
                buf.set_stringn(inner.x, y, "Loading…", width, Style::default().fg(Color::DarkGray));
            }
            (None, false, Some(err)) => {
                buf.set_stringn(inner.x, y, err, width, Style::default().fg(Color::Red));
            }
            (None, false, None) => {
                buf.set_stringn(inner.x, y, "No data available", width, Style::default().fg(Color::DarkGray));
            }
        }
    }
}
