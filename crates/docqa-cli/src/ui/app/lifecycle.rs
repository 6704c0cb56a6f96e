//! Application lifecycle operations (constructors, raw mode)

use std::io;
use std::sync::Arc;

use crossterm::terminal;
use docqa_core::Result;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tokio::sync::mpsc;

use super::tui_app::{AppOptions, TuiApp};
use crate::ui::event_source::{CrosstermEventSource, InputEventSource};
use crate::ui::input::{Field, InputManager};
use crate::ui::jobs::{JobRunner, RemoteServices, ServiceFactory};
use crate::ui::layout;
use crate::ui::renderer::{FocusedPane, Renderer};
use crate::ui::state::{Phase, UiState};
use crate::ui::theme::Theme;

impl TuiApp<CrosstermBackend<io::Stdout>> {
    /// Creates a `TuiApp` drawing to stdout and calling the configured remote services
    ///
    /// # Errors
    /// Returns an error if terminal initialization or clearing fails.
    pub fn new(options: AppOptions) -> Result<Self> {
        let services: Arc<dyn ServiceFactory> =
            Arc::new(RemoteServices::new(Arc::clone(&options.config)));
        let mut app = Self::with_backend(
            CrosstermBackend::new(io::stdout()),
            Box::new(CrosstermEventSource::new()),
            services,
            options,
        )?;
        app.terminal.clear()?;
        Ok(app)
    }

    /// Enables raw mode
    ///
    /// # Errors
    /// Returns an error if enabling raw mode fails.
    pub fn enable_raw_mode() -> Result<()> {
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Disables raw mode
    ///
    /// # Errors
    /// Returns an error if disabling raw mode or clearing the terminal fails.
    pub fn disable_raw_mode(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.clear()?;
        Ok(())
    }
}

impl<B: Backend> TuiApp<B> {
    /// Creates a `TuiApp` over any backend, event source and service factory
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be created.
    pub fn with_backend(
        backend: B,
        event_source: Box<dyn InputEventSource + Send>,
        services: Arc<dyn ServiceFactory>,
        options: AppOptions,
    ) -> Result<Self> {
        let AppOptions {
            config,
            config_path,
            session,
            file_format,
            files,
        } = options;

        let terminal = Terminal::new(backend)?;
        let (sender, receiver) = mpsc::unbounded_channel();

        let theme = Theme::from_name(&config.ui.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using the default", config.ui.theme);
            Theme::default()
        });

        let mut state = UiState::new(session);
        state.file_format = file_format;

        let mut input_manager = InputManager::default();
        if !files.is_empty() {
            input_manager.set_text(Field::Files, &files);
        }

        let focused_pane = if state.phase == Phase::NoApiKey {
            FocusedPane::ApiKey
        } else {
            FocusedPane::Files
        };

        Ok(Self {
            terminal,
            event_source,
            job_receiver: receiver,
            job_runner: JobRunner::new(services, Arc::clone(&config), sender),
            state,
            input_manager,
            renderer: Renderer::new(theme),
            focused_pane,
            layout_cache: layout::LayoutCache::new(),
            config,
            config_path,
        })
    }
}
