use core::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Secret credential for the model-serving API.
///
/// The key is only ever held in memory. Its `Debug` and `Display`
/// implementations are redacted so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Parses user input into a key. Returns `None` for empty or whitespace-only input.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Exposes the secret for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Question as submitted.
    pub question: String,
    /// Answer shown to the user.
    pub answer: String,
    /// When the question was answered.
    pub asked_at: DateTime<Utc>,
    /// Whether the answer came from the documents (false for the no-index placeholder).
    pub grounded: bool,
}

impl ChatTurn {
    /// Creates a turn answered from the knowledge index.
    pub fn grounded(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
            grounded: true,
        }
    }

    /// Creates a turn answered locally without consulting the model.
    pub fn placeholder(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            grounded: false,
            ..Self::grounded(question, answer)
        }
    }
}

/// Per-user session state.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    api_key: Option<ApiKey>,
    chat_history: Vec<ChatTurn>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            api_key: None,
            chat_history: Vec::new(),
        }
    }

    /// Session identifier, used to correlate log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stores the credential if the input is non-empty.
    ///
    /// Returns `true` when a key was stored. Empty input leaves any previous key untouched.
    pub fn set_api_key(&mut self, input: &str) -> bool {
        match ApiKey::parse(input) {
            Some(key) => {
                self.api_key = Some(key);
                tracing::info!(session = %self.id, "API key set");
                true
            }
            None => false,
        }
    }

    /// Current credential, if any.
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Whether a credential has been supplied.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Chat transcript in the order questions were asked.
    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat_history
    }

    /// Appends an answered turn.
    pub fn record_turn(&mut self, turn: ChatTurn) {
        self.chat_history.push(turn);
        tracing::debug!(
            session = %self.id,
            turns = self.chat_history.len(),
            "Recorded chat turn"
        );
    }

    /// Removes every chat turn, keeping the credential.
    pub fn clear_history(&mut self) {
        self.chat_history.clear();
    }

    /// Returns the session to its initial state, dropping the credential too.
    pub fn reset(&mut self) {
        self.api_key = None;
        self.chat_history.clear();
        tracing::info!(session = %self.id, "Session reset");
    }
}
