use std::time::Duration;

use async_trait::async_trait;
use docqa_core::config::EmbeddingConfig;
use docqa_core::{ApiKey, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Embedding, EmbeddingProvider};

/// Client for OpenAI-compatible `/embeddings` APIs.
pub struct OpenAiEmbeddingClient {
    client: Client,
    api_key: ApiKey,
    endpoint: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'req> {
    model: &'req str,
    input: &'req [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Embedding,
    index: usize,
}

impl OpenAiEmbeddingClient {
    /// Creates a client for the configured endpoint and model.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: ApiKey, config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            batch_size: config.batch_size.max(1),
        })
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Embedding>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&EmbeddingRequest {
                model: &self.model,
                input,
            })
            .send()
            .await
            .map_err(|err| Error::Embedding(format!("Request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Error::Embedding(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(Error::Embedding(format!(
                "API request failed with status {status}: {body}"
            )));
        }

        parse_embeddings(&body, input.len())
    }
}

/// Decodes an embeddings response, ordering vectors by their `index`.
fn parse_embeddings(body: &str, expected: usize) -> Result<Vec<Embedding>> {
    let response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|err| Error::Embedding(format!("Malformed embedding response: {err}")))?;

    if response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "Expected {expected} embeddings, received {}",
            response.data.len()
        )));
    }

    let mut data = response.data;
    data.sort_by_key(|item| item.index);
    if data.iter().enumerate().any(|(position, item)| position != item.index) {
        return Err(Error::Embedding("Embedding indices do not match the input".to_owned()));
    }

    Ok(data.into_iter().map(|item| item.embedding).collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut vectors = self.request(&[text.to_owned()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("No embeddings returned".to_owned()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for (batch, input) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!(batch, size = input.len(), model = %self.model, "Embedding batch");
            embeddings.extend(self.request(input).await?);
        }
        Ok(embeddings)
    }
}
