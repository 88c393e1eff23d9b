//! Text Buffer
//!
//! Editable field contents with caret and selection. Offsets are in
//! characters so they line up with the on-screen keyboard's snapshots.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::event::FieldId;
use crate::keyboard::inject::{byte_offset, splice};
use crate::keyboard::FocusTarget;

/// Handle common text input keys, returns true if key was handled
pub fn handle_text_key(buf: &mut TextBuffer, code: KeyCode, mods: KeyModifiers) -> bool {
    let extend = mods.contains(KeyModifiers::SHIFT);
    match (code, mods) {
        (KeyCode::Backspace, KeyModifiers::CONTROL | KeyModifiers::ALT) => buf.delete_word(),
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => buf.delete_word(),
        (KeyCode::Backspace, _) => buf.delete_char(),
        (KeyCode::Delete, _) => buf.delete_char_forward(),
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => buf.select_all(),
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => buf.cursor_end(false),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => buf.clear_to_start(),
        (KeyCode::Left, _) => buf.cursor_left(extend),
        (KeyCode::Right, _) => buf.cursor_right(extend),
        (KeyCode::Home, _) => buf.cursor_home(extend),
        (KeyCode::End, _) => buf.cursor_end(extend),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => buf.insert_char(c),
        _ => return false,
    }
    true
}

pub fn find_word_boundary_back(s: &str, from: usize) -> usize {
    let chars: Vec<char> = s.chars().take(from).collect();
    let mut pos = chars.len();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let is_punct = |c: char| !c.is_whitespace() && !is_word(c);

    while pos > 0 && chars[pos - 1].is_whitespace() {
        pos -= 1;
    }
    if pos == 0 { return 0; }

    if is_word(chars[pos - 1]) {
        while pos > 0 && is_word(chars[pos - 1]) {
            pos -= 1;
        }
    } else {
        // Punctuation, then the word it trails
        while pos > 0 && is_punct(chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word(chars[pos - 1]) {
            pos -= 1;
        }
    }
    pos
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.chars().count();
        Self { content, cursor, anchor: None }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Ordered selection bounds; equal when collapsed
    pub fn selection(&self) -> (usize, usize) {
        match self.anchor {
            Some(a) => (a.min(self.cursor), a.max(self.cursor)),
            None => (self.cursor, self.cursor),
        }
    }

    pub fn has_selection(&self) -> bool {
        let (start, end) = self.selection();
        start != end
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.len());
        self.anchor = None;
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.cursor = self.len();
        self.anchor = None;
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        self.cursor = end;
        self.anchor = (start != end).then_some(start);
    }

    pub fn select_all(&mut self) {
        self.select(0, self.len());
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.anchor = None;
    }

    fn delete_selection(&mut self) -> bool {
        let (start, end) = self.selection();
        self.anchor = None;
        if start == end {
            return false;
        }
        self.content = splice(&self.content, start, end, "");
        self.cursor = start;
        true
    }

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        let at = byte_offset(&self.content, self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_offset(&self.content, self.cursor);
        self.content.remove(at);
    }

    pub fn delete_char_forward(&mut self) {
        if self.delete_selection() || self.cursor >= self.len() {
            return;
        }
        let at = byte_offset(&self.content, self.cursor);
        self.content.remove(at);
    }

    pub fn delete_word(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let new_cursor = find_word_boundary_back(&self.content, self.cursor);
        self.content = splice(&self.content, new_cursor, self.cursor, "");
        self.cursor = new_cursor;
    }

    pub fn clear_to_start(&mut self) {
        self.anchor = None;
        if self.cursor == 0 {
            return;
        }
        self.content = splice(&self.content, 0, self.cursor, "");
        self.cursor = 0;
    }

    fn move_to(&mut self, pos: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(self.len());
        if self.anchor == Some(self.cursor) {
            self.anchor = None;
        }
    }

    pub fn cursor_left(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (start, _) = self.selection();
            return self.move_to(start, false);
        }
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn cursor_right(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (_, end) = self.selection();
            return self.move_to(end, false);
        }
        self.move_to(self.cursor + 1, extend);
    }

    pub fn cursor_home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn cursor_end(&mut self, extend: bool) {
        self.move_to(self.len(), extend);
    }

    /// Snapshot for the focus registry
    pub fn snapshot(&self, field: FieldId) -> FocusTarget {
        let (start, end) = self.selection();
        FocusTarget::new(field, self.content.clone(), start, end)
    }

    /// Takes over a snapshot produced by the on-screen keyboard
    pub fn adopt(&mut self, target: &FocusTarget) {
        self.content = target.value.clone();
        let (start, end) = target.selection();
        self.cursor = end;
        self.anchor = (start != end).then_some(start);
    }
}

/// One buffer per editable field
#[derive(Debug, Clone, Default)]
pub struct FieldBuffers {
    pub new_todo: TextBuffer,
    pub due_date: TextBuffer,
    pub edit: TextBuffer,
    pub login: TextBuffer,
}

impl FieldBuffers {
    pub fn get(&self, field: FieldId) -> &TextBuffer {
        match field {
            FieldId::NewTodo => &self.new_todo,
            FieldId::DueDate => &self.due_date,
            FieldId::EditTodo => &self.edit,
            FieldId::Login => &self.login,
        }
    }

    pub fn get_mut(&mut self, field: FieldId) -> &mut TextBuffer {
        match field {
            FieldId::NewTodo => &mut self.new_todo,
            FieldId::DueDate => &mut self.due_date,
            FieldId::EditTodo => &mut self.edit,
            FieldId::Login => &mut self.login,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buf = TextBuffer::new();
        buf.insert_char('h');
        buf.insert_char('i');
        assert_eq!(buf.content(), "hi");
        assert_eq!(buf.cursor(), 2);

        buf.delete_char();
        assert_eq!(buf.content(), "h");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_cursor_movement() {
        let mut buf = TextBuffer::with_content("hello");
        assert_eq!(buf.cursor(), 5);

        buf.cursor_home(false);
        assert_eq!(buf.cursor(), 0);

        buf.cursor_end(false);
        assert_eq!(buf.cursor(), 5);

        buf.cursor_left(false);
        assert_eq!(buf.cursor(), 4);

        buf.cursor_right(false);
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn test_shift_selection() {
        let mut buf = TextBuffer::with_content("hi there");
        buf.cursor_home(false);
        buf.cursor_right(true);
        buf.cursor_right(true);
        assert_eq!(buf.selection(), (0, 2));

        buf.delete_char();
        assert_eq!(buf.content(), " there");
        assert_eq!(buf.selection(), (0, 0));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = TextBuffer::with_content("hello");
        buf.select_all();
        buf.insert_char('y');
        assert_eq!(buf.content(), "y");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_arrow_collapses_selection() {
        let mut buf = TextBuffer::with_content("hello");
        buf.select(1, 4);
        buf.cursor_left(false);
        assert_eq!(buf.selection(), (1, 1));
        buf.select(1, 4);
        buf.cursor_right(false);
        assert_eq!(buf.selection(), (4, 4));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buf = TextBuffer::with_content("café");
        buf.cursor_left(false);
        buf.insert_char('ï');
        assert_eq!(buf.content(), "cafïé");
        buf.delete_char_forward();
        assert_eq!(buf.content(), "cafï");
    }

    #[test]
    fn test_delete_word_simple() {
        let mut buf = TextBuffer::with_content("hello world");
        buf.delete_word();
        assert_eq!(buf.content(), "hello ");
    }

    #[test]
    fn test_delete_word_symbol() {
        let mut buf = TextBuffer::with_content("hello!");
        buf.delete_word();
        assert_eq!(buf.content(), "");
    }

    #[test]
    fn test_clear_to_start() {
        let mut buf = TextBuffer::with_content("hello world");
        buf.set_cursor(6);
        buf.clear_to_start();
        assert_eq!(buf.content(), "world");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut buf = TextBuffer::with_content("hi there");
        buf.select(0, 2);
        let snap = buf.snapshot(FieldId::NewTodo);
        assert_eq!(snap.selection(), (0, 2));

        let mut other = TextBuffer::new();
        other.adopt(&snap);
        assert_eq!(other, buf);
    }

    #[test]
    fn test_handle_text_key() {
        let mut buf = TextBuffer::new();

        assert!(handle_text_key(&mut buf, KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(buf.content(), "a");

        assert!(handle_text_key(&mut buf, KeyCode::Left, KeyModifiers::SHIFT));
        assert_eq!(buf.selection(), (0, 1));

        assert!(handle_text_key(&mut buf, KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(buf.content(), "");

        assert!(!handle_text_key(&mut buf, KeyCode::Enter, KeyModifiers::NONE));
    }
}
