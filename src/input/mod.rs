//! Input Module
//!
//! Physical keyboard input with vim-style modal navigation.

pub mod keymap;
pub mod modes;
pub mod text_buffer;

// Re-exports
pub use modes::InputMode;
pub use text_buffer::{handle_text_key, FieldBuffers, TextBuffer};
