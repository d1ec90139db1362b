//! Voxide Application
//!
//! The main application shell providing windowing, input handling,
//! and integration of all components.

mod app;
mod event_handler;
mod shortcuts;
mod ui;

pub use app::App;
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_menu};
