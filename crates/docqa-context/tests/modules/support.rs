//! Shared fixtures for the integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use docqa_context::{Embedding, EmbeddingProvider};
use docqa_core::{Error, IgnoreLock as _, Result};

/// Vocabulary that gives the keyword embedder its dimensions.
const VOCABULARY: &[&str] = &[
    "sky", "blue", "grass", "green", "tree", "tall", "sea", "salt", "color", "colour",
];

/// Embeds text as keyword counts over a fixed vocabulary.
#[derive(Default)]
pub struct KeywordEmbedder {
    /// Every batch received, for assertions on what was indexed
    pub batches: Mutex<Vec<Vec<String>>>,
    /// Fail every request with this message
    pub failure: Option<String>,
}

impl KeywordEmbedder {
    /// An embedder whose requests all fail.
    pub fn failing(message: &str) -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            failure: Some(message.to_owned()),
        }
    }

    fn vector(text: &str) -> Embedding {
        let lower = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Embedding(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.check()?;
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        self.check()?;
        self.batches.lock_ignore_poison().push(texts.to_vec());
        Ok(texts.iter().map(|text| Self::vector(text)).collect())
    }
}
