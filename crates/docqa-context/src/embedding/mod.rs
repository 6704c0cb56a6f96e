//! Embedding clients used to index chunks and queries.

#[cfg(any(test, feature = "test-util"))]
mod fake;
mod ollama;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use docqa_core::config::{EmbeddingBackend, EmbeddingConfig};
use docqa_core::{ApiKey, Result};

#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeEmbeddingClient;
pub use ollama::OllamaEmbeddingClient;
pub use openai::OpenAiEmbeddingClient;

/// A single embedding vector
pub type Embedding = Vec<f32>;

/// Trait for generating embeddings from text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Generate embedding for text
    ///
    /// # Errors
    /// Returns `Error::Embedding` if the embedding service fails
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embed multiple texts, returning vectors in input order
    ///
    /// # Errors
    /// Returns `Error::Embedding` if any request fails or the service returns
    /// a different number of vectors than texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;
}

/// Creates the embedding client selected by the configuration.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn build_embedding_provider(
    config: &EmbeddingConfig,
    api_key: &ApiKey,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::OpenAi => Arc::new(OpenAiEmbeddingClient::new(api_key.clone(), config)?),
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbeddingClient::from_config(config)),
    };
    tracing::debug!(backend = provider.name(), "Built embedding client");
    Ok(provider)
}
