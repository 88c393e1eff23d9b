//! Key bindings
//!
//! Maps physical key events to dashboard actions per mode.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::event::Panel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    FocusNewTodo,
    FocusDueDate,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    ToggleCompleted,
    EditTodo,
    DeleteTodo,
    ToggleWidget(Panel),
    SelectAsset(usize),
    PrevMonth,
    NextMonth,
    RefreshWeather,
    Logout,
    ToggleBlackout,
    Confirm,
    Cancel,
    Submit,
    NextField,
    PrevField,
    /// Passed through to the focused field
    Edit(KeyCode, KeyModifiers),
}

/// Returns the action and the new pending key for multi-key sequences (`dd`, `gg`)
pub fn normal_mode_action(key: KeyEvent, pending: Option<char>) -> (Action, Option<char>) {
    let action = match (pending, key.code, key.modifiers) {
        (Some('d'), KeyCode::Char('d'), KeyModifiers::NONE) => Action::DeleteTodo,
        (Some('g'), KeyCode::Char('g'), KeyModifiers::NONE) => Action::SelectFirst,
        (None, KeyCode::Char(c @ ('d' | 'g')), KeyModifiers::NONE) => return (Action::None, Some(c)),
        (_, KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (_, KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (_, KeyCode::Char('a' | 'i'), KeyModifiers::NONE) => Action::FocusNewTodo,
        (_, KeyCode::Char('D'), _) => Action::FocusDueDate,
        (_, KeyCode::Char('j'), KeyModifiers::NONE) | (_, KeyCode::Down, _) => Action::SelectNext,
        (_, KeyCode::Char('k'), KeyModifiers::NONE) | (_, KeyCode::Up, _) => Action::SelectPrev,
        (_, KeyCode::Char('G'), _) => Action::SelectLast,
        (_, KeyCode::Char(' '), KeyModifiers::NONE) | (_, KeyCode::Char('x'), KeyModifiers::NONE) => {
            Action::ToggleCompleted
        }
        (_, KeyCode::Char('e'), KeyModifiers::NONE) | (_, KeyCode::Enter, _) => Action::EditTodo,
        (_, KeyCode::Char('w'), KeyModifiers::NONE) => Action::ToggleWidget(Panel::Weather),
        (_, KeyCode::Char('c'), KeyModifiers::NONE) => Action::ToggleWidget(Panel::Calendar),
        (_, KeyCode::Char('t'), KeyModifiers::NONE) => Action::ToggleWidget(Panel::DateTime),
        (_, KeyCode::Char('p'), KeyModifiers::NONE) => Action::ToggleWidget(Panel::Prices),
        (_, KeyCode::Char('T'), _) => Action::ToggleWidget(Panel::Todos),
        (_, KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::SelectAsset(c as usize - '1' as usize)
        }
        (_, KeyCode::Char('['), _) | (_, KeyCode::Char('h'), KeyModifiers::NONE) => Action::PrevMonth,
        (_, KeyCode::Char(']'), _) | (_, KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextMonth,
        (_, KeyCode::Char('r'), KeyModifiers::NONE) => Action::RefreshWeather,
        (_, KeyCode::Char('L'), _) => Action::Logout,
        (_, KeyCode::Char('b'), KeyModifiers::NONE) => Action::ToggleBlackout,
        _ => Action::None,
    };
    (action, None)
}

pub fn confirm_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

pub fn text_input_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::ALT) => Action::Edit(KeyCode::Enter, KeyModifiers::ALT),
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextField,
        (KeyCode::BackTab, _) => Action::PrevField,
        (code, mods) => Action::Edit(code, mods),
    }
}
