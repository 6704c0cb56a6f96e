use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt as _;

/// Abstraction over the input event source used by the TUI.
///
/// `next_event` resolves with the next terminal event, or `None` once the
/// source is exhausted.
#[async_trait]
pub trait InputEventSource: Send {
    /// Wait for the next input event.
    ///
    /// # Errors
    /// Returns an error if reading from the terminal fails.
    async fn next_event(&mut self) -> io::Result<Option<Event>>;
}

/// Default event source backed by crossterm's async `EventStream`.
pub struct CrosstermEventSource {
    stream: EventStream,
}

impl CrosstermEventSource {
    /// Creates a source reading from the terminal.
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputEventSource for CrosstermEventSource {
    async fn next_event(&mut self) -> io::Result<Option<Event>> {
        self.stream.next().await.transpose()
    }
}

/// Event source replaying a fixed list of events, then reporting exhaustion.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEventSource {
    events: VecDeque<Event>,
}

impl ScriptedEventSource {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key press.
    #[must_use]
    pub fn key(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
        self.events.push_back(Event::Key(KeyEvent::new(code, modifiers)));
        self
    }

    /// Appends one key press per character of `text`.
    #[must_use]
    pub fn text(self, text: &str) -> Self {
        text.chars()
            .fold(self, |source, character| source.key(KeyCode::Char(character), KeyModifiers::NONE))
    }

    /// Appends an Enter key press.
    #[must_use]
    pub fn enter(self) -> Self {
        self.key(KeyCode::Enter, KeyModifiers::NONE)
    }
}

#[async_trait]
impl InputEventSource for ScriptedEventSource {
    async fn next_event(&mut self) -> io::Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}
