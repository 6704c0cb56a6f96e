use core::fmt::Display;

use async_trait::async_trait;
use docqa_core::config::EmbeddingConfig;
use docqa_core::{Error, Result};
use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::GenerateEmbeddingsRequest;

use super::{Embedding, EmbeddingProvider};

/// Ollama embedding client
pub struct OllamaEmbeddingClient {
    ollama: Ollama,
    model: String,
}

impl OllamaEmbeddingClient {
    /// Creates a client for the configured Ollama server and model.
    #[must_use]
    #[allow(
        deprecated,
        reason = "Ollama::new is deprecated in ollama-rs 0.3.6; retained to preserve behavior"
    )]
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            ollama: Ollama::new(config.ollama_host.clone(), config.ollama_port),
            model: config.ollama_model.clone(),
        }
    }

    fn map_error(&self, error: &impl Display) -> Error {
        let message = error.to_string();
        if message.contains("model") && message.contains("not found") {
            Error::Embedding(format!(
                "Embedding model '{}' not found. Run: ollama pull {}",
                self.model, self.model
            ))
        } else {
            Error::Embedding(format!("Embedding generation failed: {message}"))
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), text.to_owned().into());

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|error| self.map_error(&error))?;

        // Ollama returns Vec<Vec<f32>>, one per input
        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embeddings returned".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::default());
        }

        let request = GenerateEmbeddingsRequest::new(self.model.clone(), texts.to_vec().into());

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|error| self.map_error(&error))?;

        if response.embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings)
    }
}
