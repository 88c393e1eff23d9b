//! UI Components
//!
//! Reusable TUI widgets for the dashboard panels.

pub mod calendar;
pub mod crypto;
pub mod datetime;
pub mod dialogs;
pub mod input_field;
pub mod keyboard;
pub mod layout;
pub mod scroll;
pub mod statusline;
pub mod todo_list;
pub mod weather;

// Re-exports
pub use calendar::CalendarView;
pub use crypto::PriceView;
pub use datetime::DateTimeView;
pub use dialogs::{ConfirmDialog, LoginDialog};
pub use keyboard::KeyboardView;
pub use scroll::ListViewState;
pub use statusline::{HelpBar, MessageType, StatusAction, StatusLine};
pub use todo_list::{TodoListView, TodoPanelLayout};
pub use weather::WeatherView;
