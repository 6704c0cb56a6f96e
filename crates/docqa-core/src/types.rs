use serde::{Deserialize, Serialize};

/// A question sent to a model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Text of the user turn.
    pub text: String,
}

impl Query {
    /// Creates a query from any string-like value.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self { text: text.into() }
    }
}

/// Generated answer returned by a model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Generated text.
    pub text: String,
    /// Token accounting reported by the service.
    pub tokens_used: TokenUsage,
    /// Provider that produced the response.
    pub provider: String,
    /// Wall-clock latency of the request.
    pub latency_ms: u64,
}

/// Token usage for a single completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input: u64,
    /// Completion tokens.
    pub output: u64,
}

impl TokenUsage {
    /// Total number of tokens billed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Instructions and retrieved passages accompanying a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// System prompt sent ahead of every user turn.
    pub system_prompt: String,
    /// Retrieved document passages.
    pub passages: Vec<Passage>,
}

impl Context {
    /// Creates a context with the given system prompt and no passages.
    pub fn new<T: Into<String>>(system_prompt: T) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            passages: Vec::new(),
        }
    }

    /// Attaches retrieved passages.
    #[must_use]
    pub fn with_passages(mut self, passages: Vec<Passage>) -> Self {
        self.passages = passages;
        self
    }

    /// Renders passages as a single block, separated by blank lines.
    #[must_use]
    pub fn passages_to_string(&self) -> String {
        self.passages
            .iter()
            .map(|passage| passage.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Rough token estimate (~4 characters per token).
    #[must_use]
    pub fn token_estimate(&self) -> usize {
        let passages_len: usize = self
            .passages
            .iter()
            .map(|passage| passage.content.len())
            .sum();
        (self.system_prompt.len() + passages_len) / 4
    }
}

/// A fragment of an uploaded document included in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// File the passage was extracted from.
    pub source: String,
    /// 1-based page number, when the format has pages.
    pub page: Option<usize>,
    /// Passage text.
    pub content: String,
}

impl Passage {
    /// Creates a passage.
    pub fn new(source: impl Into<String>, page: Option<usize>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page,
            content: content.into(),
        }
    }

    /// Human readable location, e.g. `report.pdf p.3`.
    #[must_use]
    pub fn location(&self) -> String {
        self.page.map_or_else(
            || self.source.clone(),
            |page| format!("{} p.{page}", self.source),
        )
    }
}
