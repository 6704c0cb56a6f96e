//! TUI application module
//!
//! The application logic is split into focused sub-modules.

mod event_loop;
mod key_handling;
mod lifecycle;
mod test_helpers;
mod tui_app;

pub use tui_app::{AppOptions, TuiApp};
