//! Keyboard Surface
//!
//! Fixed on-screen key layout. Activating a key (mouse or touch pointer-down)
//! injects into the engaged field and swallows the event so the document
//! never sees it and focus stays where it was.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::event::{Dispatch, DomEvent, ElementId, EventKind, Phase};

use super::focus::FocusRegistry;
use super::inject::{KeySymbol, KeystrokeInjector};

const CHAR_ROWS: [&str; 4] = ["1234567890", "qwertyuiop", "asdfghjkl", "zxcvbnm"];

pub const KEY_WIDTH: u16 = 5;
pub const KEY_GAP: u16 = 1;
pub const ROW_GAP: u16 = 1;
const SPACE_KEYS: u16 = 5;
const HIGHLIGHT_FOR: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct KeyboardSurface {
    rows: Vec<Vec<KeySymbol>>,
    injector: KeystrokeInjector,
    last_pressed: Option<(usize, Instant)>,
}

impl KeyboardSurface {
    pub fn new(injector: KeystrokeInjector) -> Self {
        let mut rows: Vec<Vec<KeySymbol>> = CHAR_ROWS
            .iter()
            .map(|row| row.chars().map(KeySymbol::Char).collect())
            .collect();
        if let Some(last) = rows.last_mut() {
            last.push(KeySymbol::DeleteBackward);
        }
        rows.push(vec![KeySymbol::Char(' ')]);

        Self { rows, injector, last_pressed: None }
    }

    pub fn rows(&self) -> &[Vec<KeySymbol>] {
        &self.rows
    }

    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn key(&self, index: usize) -> Option<KeySymbol> {
        self.rows.iter().flatten().nth(index).copied()
    }

    pub fn index_of(&self, key: KeySymbol) -> Option<usize> {
        self.rows.iter().flatten().position(|k| *k == key)
    }

    /// Injects the key at `index` into whatever the registry holds
    pub fn activate(&mut self, registry: &FocusRegistry, index: usize) -> bool {
        let Some(key) = self.key(index) else {
            return false;
        };
        self.last_pressed = Some((index, Instant::now()));
        self.injector.inject(registry, key)
    }

    /// Highlights `key` without injecting it
    pub fn flash(&mut self, key: KeySymbol) {
        if let Some(index) = self.index_of(key) {
            self.last_pressed = Some((index, Instant::now()));
        }
    }

    /// Element handler for the keyboard root and its keys
    pub fn handle(&mut self, registry: &FocusRegistry, d: Dispatch, event: &mut DomEvent) {
        let EventKind::PointerDown { .. } = event.kind else {
            return;
        };
        match (d.node, d.phase) {
            (ElementId::Key(index), Phase::Target) => {
                self.activate(registry, index);
                event.stop_propagation();
                event.prevent_default();
            }
            (ElementId::Keyboard, Phase::Target | Phase::Bubble) => {
                event.stop_propagation();
                event.prevent_default();
            }
            _ => {}
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.last_pressed
            .filter(|(_, at)| at.elapsed() < HIGHLIGHT_FOR)
            .map(|(i, _)| i)
    }

    /// Inner size (without border) the layout needs
    pub fn content_size(&self) -> (u16, u16) {
        let widest = self.rows.iter().map(|r| self.row_width(r)).max().unwrap_or(0);
        let rows = self.rows.len() as u16;
        (widest, rows + rows.saturating_sub(1) * ROW_GAP)
    }

    fn key_width(key: KeySymbol) -> u16 {
        match key {
            KeySymbol::Char(' ') => SPACE_KEYS * KEY_WIDTH + (SPACE_KEYS - 1) * KEY_GAP,
            _ => KEY_WIDTH,
        }
    }

    fn row_width(&self, row: &[KeySymbol]) -> u16 {
        let keys: u16 = row.iter().map(|k| Self::key_width(*k)).sum();
        keys + (row.len() as u16).saturating_sub(1) * KEY_GAP
    }

    /// Cell rectangle of every key inside `inner`, rows centered.
    /// Keys that do not fit are omitted.
    pub fn key_areas(&self, inner: Rect) -> Vec<(usize, Rect)> {
        let mut areas = Vec::with_capacity(self.key_count());
        let mut index = 0;

        for (r, row) in self.rows.iter().enumerate() {
            let y = inner.y + r as u16 * (1 + ROW_GAP);
            let width = self.row_width(row);
            let mut x = inner.x + inner.width.saturating_sub(width) / 2;

            for key in row {
                let w = Self::key_width(*key);
                let fits = y < inner.y + inner.height && x + w <= inner.x + inner.width;
                if fits {
                    areas.push((index, Rect::new(x, y, w, 1)));
                }
                x += w + KEY_GAP;
                index += 1;
            }
        }
        areas
    }
}
