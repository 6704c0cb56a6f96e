//! Main event loop and event processing logic

use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};
use docqa_core::{Error, Result};
use ratatui::backend::Backend;
use tokio::time::{self, MissedTickBehavior};

use super::tui_app::TuiApp;
use crate::ui::jobs::JobOutcome;
use crate::ui::renderer::RenderCtx;
use crate::ui::state::JobRequest;

/// Spinner frame period while a job runs
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

impl<B: Backend> TuiApp<B> {
    /// Run the main event loop until quit
    ///
    /// Terminal input and finished jobs are processed concurrently using
    /// `tokio::select!`; the spinner only ticks while a job is running.
    ///
    /// # Errors
    /// Returns an error if reading input or rendering fails.
    pub async fn run_event_loop(&mut self) -> Result<()> {
        let mut spinner = time::interval(SPINNER_INTERVAL);
        spinner.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.render()?;

        loop {
            tokio::select! {
                event_result = self.event_source.next_event() => {
                    match event_result {
                        Ok(Some(event)) => {
                            if self.handle_event(&event) {
                                break;
                            }
                        }
                        Ok(None) => break,
                        Err(error) => return Err(Error::Io(error)),
                    }
                }

                Some(outcome) = self.job_receiver.recv() => {
                    self.apply_outcome(outcome);
                }

                _ = spinner.tick(), if self.state.phase.is_busy() => {
                    self.state.tick();
                }
            }

            self.render()?;
        }

        Ok(())
    }

    /// Handles one input event and returns true if the app should quit
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event
            && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
        {
            return self.handle_key_event(key);
        }
        false
    }

    /// Applies a finished job to the UI state
    pub(super) fn apply_outcome(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Ingested(result) => self.state.finish_ingest(result),
            JobOutcome::Answered { question, result } => {
                self.state.finish_answer(&question, result);
            }
        }
    }

    /// Hands a request to a background job authenticated with the session key
    pub(super) fn dispatch(&mut self, request: JobRequest) {
        match self.state.session.api_key().cloned() {
            Some(api_key) => drop(self.job_runner.spawn(request, api_key)),
            None => {
                let error = Error::MissingApiKey("enter an OpenAI API key first".to_owned());
                self.apply_outcome(JobOutcome::failed(request, error));
            }
        }
    }

    /// Renders the UI to the terminal
    ///
    /// # Errors
    /// Returns an error if drawing to the terminal fails.
    pub fn render(&mut self) -> Result<()> {
        let layout_cache = &mut self.layout_cache;
        let renderer = &self.renderer;
        let state = &self.state;
        let input_manager = &self.input_manager;
        let focused_pane = self.focused_pane;

        self.terminal.draw(|frame| {
            let mut ctx = RenderCtx {
                state,
                input: input_manager,
                focused: focused_pane,
                layout_cache,
            };
            renderer.render(frame, &mut ctx);
        })?;

        Ok(())
    }
}
