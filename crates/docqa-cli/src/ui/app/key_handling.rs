//! Keyboard input handling and dispatch

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::Backend;

use super::tui_app::TuiApp;
use crate::ui::input::Field;
use crate::ui::layout;
use crate::ui::renderer::{FocusedPane, answer_text};
use crate::ui::state::{Phase, parse_file_field};

impl<B: Backend> TuiApp<B> {
    /// Handles a single key event and returns true if the app should quit
    pub(super) fn handle_key_event(&mut self, key: &KeyEvent) -> bool {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q' | 'c') if control => return true,
            KeyCode::Esc => return true,
            KeyCode::Char('l') if control => self.state.clear_history(),
            KeyCode::Char('r') if control => self.reset_session(),
            KeyCode::Char('t') if control => self.cycle_theme(),
            KeyCode::Tab => self.focused_pane = self.focused_pane.next(),
            KeyCode::BackTab => self.focused_pane = self.focused_pane.previous(),
            KeyCode::Enter => self.handle_enter_key(),
            KeyCode::Up => self.state.select_newer(),
            KeyCode::Down => self.state.select_older(),
            KeyCode::PageUp => self.scroll_answer_up(),
            KeyCode::PageDown => self.scroll_answer_down(),
            _ => self.handle_other_key(key),
        }
        false
    }

    /// Submits the focused pane
    fn handle_enter_key(&mut self) {
        match self.focused_pane {
            FocusedPane::ApiKey => self.submit_api_key(),
            FocusedPane::FileType => {
                self.state.set_file_format(self.state.file_format.next());
            }
            FocusedPane::Files => self.submit_files(),
            FocusedPane::Question => self.submit_question(),
            FocusedPane::History => {
                if self.state.selected_history.is_some() {
                    self.state.selected_history = None;
                } else {
                    self.state.select_older();
                }
            }
        }
    }

    fn submit_api_key(&mut self) {
        let was_locked = self.state.phase == Phase::NoApiKey;
        let input = self.input_manager.text(Field::ApiKey);
        self.state.submit_api_key(&input);
        self.input_manager.clear(Field::ApiKey);

        if was_locked && self.state.phase != Phase::NoApiKey {
            self.focused_pane = FocusedPane::FileType;
        }
    }

    fn reset_session(&mut self) {
        let was_busy = self.state.phase.is_busy();
        self.state.reset_session();
        if !was_busy {
            self.input_manager.clear(Field::ApiKey);
            self.focused_pane = FocusedPane::ApiKey;
        }
    }

    fn submit_files(&mut self) {
        let paths = parse_file_field(&self.input_manager.text(Field::Files));
        if let Some(request) = self.state.begin_ingest(paths) {
            tracing::info!(format = %self.state.file_format, "Processing documents");
            self.dispatch(request);
        }
    }

    fn submit_question(&mut self) {
        let question = self.input_manager.text(Field::Question);
        let turns_before = self.state.session.chat_history().len();

        let request = self.state.begin_question(&question);
        let accepted = request.is_some() || self.state.session.chat_history().len() != turns_before;
        if let Some(request) = request {
            self.dispatch(request);
        }
        if accepted {
            self.input_manager.clear(Field::Question);
        }
    }

    /// Handles keys that depend on the focused pane
    fn handle_other_key(&mut self, key: &KeyEvent) {
        if self.focused_pane == FocusedPane::FileType {
            match key.code {
                KeyCode::Left => self.state.set_file_format(self.state.file_format.previous()),
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.state.set_file_format(self.state.file_format.next());
                }
                _ => {}
            }
            return;
        }

        if let Some(field) = self.focused_pane.field() {
            self.input_manager.handle_key(field, key);
        }
    }

    fn answer_scroll_step(&self) -> u16 {
        (self.layout_cache.answer_viewport_height() / 2).max(1)
    }

    fn scroll_answer_up(&mut self) {
        self.state.answer_scroll = self.state.answer_scroll.saturating_sub(self.answer_scroll_step());
    }

    fn scroll_answer_down(&mut self) {
        let max_scroll = layout::max_answer_scroll(&self.layout_cache, &answer_text(&self.state));
        self.state.answer_scroll = self
            .state
            .answer_scroll
            .saturating_add(self.answer_scroll_step())
            .min(max_scroll);
    }

    /// Cycles to the next theme and saves it to the config file
    fn cycle_theme(&mut self) {
        let theme = self.renderer.theme().next();
        self.renderer.set_theme(theme);
        Arc::make_mut(&mut self.config).ui.theme = theme.name().to_owned();

        if let Some(path) = &self.config_path
            && let Err(error) = self.config.save_to_file(path)
        {
            tracing::warn!("Failed to save theme to {}: {error}", path.display());
        }
    }
}
