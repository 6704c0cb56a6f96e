//! Library interface for docqa-cli
//!
//! Exposes the command line, handlers and TUI components for integration testing
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        reason = "Test allows"
    )
)]

/// Command-line argument definitions
pub mod cli;
/// Command handlers: logging, configuration and session setup
pub mod handlers;
/// TUI session runner
pub mod interactive;
/// UI module is public for integration testing
pub mod ui;

pub use cli::{Cli, FileType};
pub use ui::event_source::{CrosstermEventSource, InputEventSource, ScriptedEventSource};
pub use ui::input::{Field, InputManager};
pub use ui::jobs::{JobOutcome, JobRunner, RemoteServices, ServiceFactory};
pub use ui::renderer::{FocusedPane, Renderer};
pub use ui::state::{Phase, UiState};
pub use ui::{AppOptions, TuiApp};
