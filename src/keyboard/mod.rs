//! On-screen Keyboard
//!
//! Routes on-screen key presses into the text field the user last focused.

pub mod dismissal;
pub mod focus;
pub mod inject;
pub mod surface;

// Re-exports
pub use dismissal::{DismissalController, DismissalState};
pub use focus::{FocusRegistry, FocusTarget, FocusWatcher};
pub use inject::{InsertPolicy, KeySymbol, KeystrokeInjector};
pub use surface::KeyboardSurface;
