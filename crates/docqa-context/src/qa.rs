//! Retrieval-augmented question answering over a knowledge index.

use std::fmt::Write as _;
use std::sync::Arc;

use docqa_core::config::RetrievalConfig;
use docqa_core::{ChatTurn, Context, Error, ModelProvider, Passage, Query, Result};

use crate::index::Retriever;

/// Answer given when a question arrives before any document was processed.
pub const NO_INDEX_PLACEHOLDER: &str = "Please process a document before asking questions.";

/// System prompt for the answering call.
const QA_SYSTEM_PROMPT: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// System prompt for condensing a follow-up into a standalone question.
const CONDENSE_SYSTEM_PROMPT: &str = "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.";

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// No index exists yet; the fixed placeholder text
    Placeholder(String),
    /// Model answer grounded on retrieved chunks
    Generated {
        /// Answer text
        text: String,
        /// Locations of the chunks given to the model
        sources: Vec<String>,
    },
}

impl Answer {
    /// Answer text as shown to the user.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Placeholder(text) | Self::Generated { text, .. } => text,
        }
    }

    /// Converts the answer into a transcript entry for `question`.
    #[must_use]
    pub fn into_turn(self, question: impl Into<String>) -> ChatTurn {
        match self {
            Self::Placeholder(text) => ChatTurn::placeholder(question, text),
            Self::Generated { text, .. } => ChatTurn::grounded(question, text),
        }
    }
}

/// Answers questions by retrieving chunks and asking the completion model.
#[derive(Clone)]
pub struct QaOrchestrator {
    provider: Arc<dyn ModelProvider>,
    top_k: usize,
    rephrase_question: bool,
}

impl QaOrchestrator {
    /// Default number of chunks retrieved per question.
    pub const DEFAULT_TOP_K: usize = 4;

    /// Creates an orchestrator with default retrieval settings.
    #[must_use]
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            top_k: Self::DEFAULT_TOP_K,
            rephrase_question: true,
        }
    }

    /// Creates an orchestrator using the configured retrieval settings.
    #[must_use]
    pub fn from_config(provider: Arc<dyn ModelProvider>, config: &RetrievalConfig) -> Self {
        Self::new(provider)
            .with_top_k(config.top_k)
            .with_rephrase_question(config.rephrase_question)
    }

    /// Sets the number of chunks retrieved per question.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Enables or disables condensing follow-ups into standalone questions.
    #[must_use]
    pub fn with_rephrase_question(mut self, rephrase_question: bool) -> Self {
        self.rephrase_question = rephrase_question;
        self
    }

    /// Answers `question` against `index`, using `history` for follow-ups.
    ///
    /// Without an index the placeholder is returned and the model is not called.
    /// Placeholder turns in `history` are never sent to the model.
    ///
    /// # Errors
    /// Returns an error if the question is blank, retrieval fails, or the
    /// completion service fails.
    pub async fn answer(
        &self,
        index: Option<&dyn Retriever>,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<Answer> {
        let Some(index) = index else {
            tracing::debug!("Question asked before any document was processed");
            return Ok(Answer::Placeholder(NO_INDEX_PLACEHOLDER.to_owned()));
        };

        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Other("Question is empty".to_owned()));
        }

        let grounded: Vec<&ChatTurn> = history.iter().filter(|turn| turn.grounded).collect();
        let standalone = if self.rephrase_question && !grounded.is_empty() {
            self.condense(&grounded, question).await?
        } else {
            question.to_owned()
        };

        let retrieved = index.retrieve(&standalone, self.top_k).await?;
        let passages: Vec<Passage> = retrieved.iter().map(|result| result.chunk.to_passage()).collect();

        let mut sources: Vec<String> = Vec::new();
        for passage in &passages {
            let location = passage.location();
            if !sources.contains(&location) {
                sources.push(location);
            }
        }

        let context = Context::new(QA_SYSTEM_PROMPT).with_passages(passages);
        let query = Query::new(format!("Question: {standalone}\nHelpful Answer:"));
        let response = self.provider.generate(&query, &context).await?;

        tracing::info!(
            provider = %response.provider,
            chunks = retrieved.len(),
            tokens = response.tokens_used.total(),
            "Answered question"
        );

        Ok(Answer::Generated {
            text: response.text,
            sources,
        })
    }

    async fn condense(&self, history: &[&ChatTurn], question: &str) -> Result<String> {
        let mut transcript = String::new();
        for turn in history {
            writeln!(transcript, "Human: {}\nAssistant: {}", turn.question, turn.answer).unwrap_or(());
        }

        let query = Query::new(format!(
            "Chat History:\n{transcript}Follow Up Input: {question}\nStandalone question:"
        ));
        let response = self
            .provider
            .generate(&query, &Context::new(CONDENSE_SYSTEM_PROMPT))
            .await?;

        let standalone = response.text.trim();
        tracing::debug!(turns = history.len(), "Condensed follow-up question");
        if standalone.is_empty() {
            Ok(question.to_owned())
        } else {
            Ok(standalone.to_owned())
        }
    }
}
