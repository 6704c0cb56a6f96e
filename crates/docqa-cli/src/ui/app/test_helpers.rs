//! Accessors and helpers for driving a `TuiApp` from tests
//!
//! Build the app with `TuiApp::with_backend` over a `TestBackend`, feed it
//! events with `handle_event`, then `wait_for_job` to apply background results.

use ratatui::backend::Backend;

use super::tui_app::TuiApp;
use crate::ui::input::InputManager;
use crate::ui::renderer::FocusedPane;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;

impl<B: Backend> TuiApp<B> {
    /// Gets a reference to the terminal backend
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Gets immutable access to UI state
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Gets immutable access to the text fields
    pub fn input(&self) -> &InputManager {
        &self.input_manager
    }

    /// Currently focused pane
    pub fn focused_pane(&self) -> FocusedPane {
        self.focused_pane
    }

    /// Sets the focused pane
    pub fn set_focused_pane(&mut self, pane: FocusedPane) {
        self.focused_pane = pane;
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.renderer.theme()
    }

    /// Waits for the next background job to finish and applies it.
    ///
    /// Only call this after an action started a job; it waits otherwise.
    pub async fn wait_for_job(&mut self) {
        if let Some(outcome) = self.job_receiver.recv().await {
            self.apply_outcome(outcome);
        }
    }
}
