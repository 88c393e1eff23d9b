//! Input Modes
//!
//! Modal state machine for the dashboard: navigating, typing into a field,
//! answering a confirmation, or signing in.

/// Input mode enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Insert,
    Confirm,
    Login,
}

impl InputMode {
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Confirm => "CONFIRM",
            Self::Login => "LOGIN",
        }
    }
}

/// Mode state with associated data
#[derive(Debug, Clone)]
pub struct ModeState {
    pub mode: InputMode,
    pub pending: Option<char>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            pending: None,
        }
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.pending = None;
    }

    pub fn to_normal(&mut self) {
        self.set_mode(InputMode::Normal);
    }

    pub fn to_insert(&mut self) {
        self.set_mode(InputMode::Insert);
    }

    pub fn to_confirm(&mut self) {
        self.set_mode(InputMode::Confirm);
    }

    pub fn to_login(&mut self) {
        self.set_mode(InputMode::Login);
    }
}
