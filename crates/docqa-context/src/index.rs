//! In-memory knowledge index over embedded chunks.

use core::cmp::Ordering;
use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use docqa_core::{Error, Result};

use crate::chunking::DocumentChunk;
use crate::embedding::{Embedding, EmbeddingProvider};

/// A chunk returned by retrieval, with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// Matched chunk
    pub chunk: DocumentChunk,
    /// Cosine similarity to the query
    pub score: f32,
}

/// Entry in the vector store
#[derive(Debug, Clone)]
struct VectorEntry {
    chunk: DocumentChunk,
    embedding: Embedding,
}

/// In-memory vector store searched by cosine similarity
#[derive(Debug, Default, Clone)]
pub struct VectorStore {
    entries: Vec<VectorEntry>,
}

impl VectorStore {
    /// Add a chunk embedding to the store
    pub fn add(&mut self, chunk: DocumentChunk, embedding: Embedding) {
        self.entries.push(VectorEntry { chunk, embedding });
    }

    /// Returns the `top_k` most similar chunks, best first.
    ///
    /// Equal scores keep insertion order.
    #[must_use]
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<RetrievedChunk> {
        let mut scores: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(query_embedding, &entry.embedding)))
            .collect();

        scores.sort_by(|first, second| second.1.partial_cmp(&first.1).unwrap_or(Ordering::Equal));

        scores
            .into_iter()
            .take(top_k)
            .filter_map(|(position, score)| {
                self.entries.get(position).map(|entry| RetrievedChunk {
                    chunk: entry.chunk.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Get number of stored embeddings
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored chunks in insertion order
    pub fn chunks(&self) -> impl Iterator<Item = &DocumentChunk> + '_ {
        self.entries.iter().map(|entry| &entry.chunk)
    }
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(vector_a: &[f32], vector_b: &[f32]) -> f32 {
    if vector_a.len() != vector_b.len() {
        return 0.0;
    }

    let dot_product: f32 = vector_a
        .iter()
        .zip(vector_b.iter())
        .map(|(x, y)| x * y)
        .sum();
    let magnitude_a = vector_a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b = vector_b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Source of chunks relevant to a question.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns up to `top_k` chunks relevant to `query`, best first.
    ///
    /// # Errors
    /// Returns `Error::Embedding` if the query cannot be embedded.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>>;
}

/// Searchable index built from one upload.
pub struct KnowledgeIndex {
    store: VectorStore,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl KnowledgeIndex {
    /// Number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the index holds no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Distinct source names, in first-seen order.
    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for chunk in self.store.chunks() {
            if !sources.contains(&chunk.source) {
                sources.push(chunk.source.clone());
            }
        }
        sources
    }
}

impl fmt::Debug for KnowledgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeIndex")
            .field("chunks", &self.store.len())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

#[async_trait]
impl Retriever for KnowledgeIndex {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&query_embedding, top_k);
        tracing::debug!(
            top_k,
            returned = results.len(),
            best_score = results.first().map(|result| result.score),
            "Retrieved chunks"
        );
        Ok(results)
    }
}

/// Builds a fresh [`KnowledgeIndex`] from chunks.
pub struct IndexBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexBuilder {
    /// Creates a builder that embeds with `embedder`.
    #[must_use]
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Embeds every chunk and stores it.
    ///
    /// # Errors
    /// Returns `Error::EmptyDocuments` for no chunks, and `Error::Embedding`
    /// if the embedding service fails or returns the wrong number of vectors.
    pub async fn build(self, chunks: Vec<DocumentChunk>) -> Result<KnowledgeIndex> {
        if chunks.is_empty() {
            return Err(Error::EmptyDocuments);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "Expected {} embeddings, received {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut store = VectorStore::default();
        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            store.add(chunk, embedding);
        }

        tracing::info!(
            chunks = store.len(),
            embedder = self.embedder.name(),
            "Built knowledge index"
        );

        Ok(KnowledgeIndex {
            store,
            embedder: self.embedder,
        })
    }
}
