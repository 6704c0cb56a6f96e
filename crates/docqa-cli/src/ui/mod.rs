//! User interface (TUI) subsystem for docqa.
//! Provides rendering, event handling, background jobs and the session phase machine.

/// Input event source abstraction (public so tests can inject events)
pub mod event_source;
/// Text field management
pub mod input;
/// Background ingestion and answering jobs
pub mod jobs;
/// Layout calculation utilities
pub mod layout;
/// Rendering components
pub mod renderer;
/// UI state management
pub mod state;
/// Theme definitions
pub mod theme;

/// TUI application and main event loop
mod app;

pub use app::{AppOptions, TuiApp};
