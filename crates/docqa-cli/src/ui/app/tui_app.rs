//! Main TUI application struct

use std::path::PathBuf;
use std::sync::Arc;

use docqa_context::DocumentFormat;
use docqa_core::{AppConfig, Session};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc;

use crate::ui::event_source::InputEventSource;
use crate::ui::input::InputManager;
use crate::ui::jobs::{JobOutcome, JobRunner};
use crate::ui::layout;
use crate::ui::renderer::{FocusedPane, Renderer};
use crate::ui::state::UiState;

/// Main TUI application
pub struct TuiApp<B: Backend> {
    /// Terminal instance used to render the UI
    pub(super) terminal: Terminal<B>,
    /// Source of input events (abstracted for testing)
    pub(super) event_source: Box<dyn InputEventSource + Send>,
    /// Channel receiving finished background jobs
    pub(super) job_receiver: mpsc::UnboundedReceiver<JobOutcome>,
    /// Spawns ingestion and answering jobs
    pub(super) job_runner: JobRunner,
    /// Session phase, credential, index and transcript
    pub(super) state: UiState,
    /// Text fields
    pub(super) input_manager: InputManager,
    /// Responsible for drawing UI components
    pub(super) renderer: Renderer,
    /// Which pane currently has focus
    pub(super) focused_pane: FocusedPane,
    /// Cache of actual rendered layout dimensions
    pub(super) layout_cache: layout::LayoutCache,
    /// Loaded configuration
    pub(super) config: Arc<AppConfig>,
    /// Where theme changes are saved, if anywhere
    pub(super) config_path: Option<PathBuf>,
}

/// Startup settings for a [`TuiApp`]
#[derive(Debug, Default)]
pub struct AppOptions {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Where theme changes are saved; `None` keeps them in memory
    pub config_path: Option<PathBuf>,
    /// Session to start with, possibly already holding a credential
    pub session: Session,
    /// Preselected document type
    pub file_format: DocumentFormat,
    /// Pre-filled file field
    pub files: String,
}

// All input is sourced from `event_source` so tests can inject events.
