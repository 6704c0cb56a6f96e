use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash as _, Hasher as _};

use async_trait::async_trait;
use docqa_core::Result;

use super::{Embedding, EmbeddingProvider};

/// Number of dimensions produced by the fake client.
const DIMENSIONS: usize = 256;

/// Test-only fake embedding provider (deterministic, hash-based)
///
/// Each lowercase word is hashed into a bucket, so texts sharing words get
/// similar vectors. Use this to exercise indexing and retrieval without a
/// network service.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeEmbeddingClient;

impl FakeEmbeddingClient {
    /// Generate fake deterministic embedding for testing
    #[must_use]
    pub fn fake_embedding(text: &str) -> Embedding {
        let mut vector = vec![0.0f32; DIMENSIONS];
        for word in text
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % DIMENSIONS as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        Ok(Self::fake_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| Self::fake_embedding(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_embedding_is_deterministic() {
        assert_eq!(
            FakeEmbeddingClient::fake_embedding("The sky is blue"),
            FakeEmbeddingClient::fake_embedding("the SKY is blue!")
        );
        assert_eq!(FakeEmbeddingClient::fake_embedding("x").len(), DIMENSIONS);
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let client = FakeEmbeddingClient;
        let texts = vec!["grass".to_owned(), "sky".to_owned()];
        let batch = client.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[1], client.embed("sky").await.unwrap());
    }
}
