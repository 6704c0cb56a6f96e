//! Mock provider for testing question answering.
//!
//! Allows defining canned responses for specific queries and records every
//! call, enabling end-to-end tests of the answering flow without real API calls.

use async_trait::async_trait;
use docqa_core::{Context, Error, IgnoreLock as _, ModelProvider, Query, Response, Result, TokenUsage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Response storage type
type ResponseMap = Arc<Mutex<HashMap<String, String>>>;

/// A query and context received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Query as sent by the caller
    pub query: Query,
    /// Context as sent by the caller
    pub context: Context,
}

/// Mock provider that returns pre-defined responses based on query patterns.
#[derive(Clone, Default)]
pub struct MockProvider {
    /// Predefined responses keyed by query substring
    responses: ResponseMap,
    /// Default response if no match found
    default_response: Arc<Mutex<Option<String>>>,
    /// Error message returned instead of a response
    failure: Arc<Mutex<Option<String>>>,
    /// Call history for verification
    call_history: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern-based response to the mock provider.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        {
            let mut responses = self.responses.lock_ignore_poison();
            responses.insert(pattern.into(), response.into());
        }
        self
    }

    /// Set a default response for queries that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        {
            let mut default = self.default_response.lock_ignore_poison();
            *default = Some(response.into());
        }
        self
    }

    /// Make every call fail with a completion error.
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        {
            let mut failure = self.failure.lock_ignore_poison();
            *failure = Some(message.into());
        }
        self
    }

    /// Get the call history.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        let history = self.call_history.lock_ignore_poison();
        history.clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let history = self.call_history.lock_ignore_poison();
        history.len()
    }

    /// Find a matching response for the given query text.
    fn find_response(&self, query_text: &str) -> Option<String> {
        let responses = self.responses.lock_ignore_poison();

        if let Some(response) = responses.get(query_text) {
            return Some(response.clone());
        }

        responses
            .iter()
            .filter(|(pattern, _)| query_text.contains(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, query: &Query, context: &Context) -> Result<Response> {
        {
            let mut history = self.call_history.lock_ignore_poison();
            history.push(RecordedCall {
                query: query.clone(),
                context: context.clone(),
            });
        }

        let failure = self.failure.lock_ignore_poison().clone();
        if let Some(message) = failure {
            return Err(Error::Completion(message));
        }

        let text = self.find_response(&query.text).unwrap_or_else(|| {
            let default = self.default_response.lock_ignore_poison();
            default
                .clone()
                .unwrap_or_else(|| format!("Mock response for query: {}", query.text))
        });

        Ok(Response {
            text,
            tokens_used: TokenUsage {
                input: query.text.len() as u64,
                output: 0,
            },
            provider: self.name().to_owned(),
            latency_ms: 0,
        })
    }
}
