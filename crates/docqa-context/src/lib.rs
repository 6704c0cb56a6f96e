//! Document ingestion, chunking, knowledge indexing and retrieval-augmented answering.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        reason = "Test allows"
    )
)]

pub mod chunking;
pub mod embedding;
pub mod index;
pub mod ingest;
/// Upload-to-index pipeline.
pub mod pipeline;
pub mod qa;

pub use chunking::{ChunkConfig, DocumentChunk, split_documents};
#[cfg(any(test, feature = "test-util"))]
pub use embedding::FakeEmbeddingClient;
pub use embedding::{
    Embedding, EmbeddingProvider, OllamaEmbeddingClient, OpenAiEmbeddingClient,
    build_embedding_provider,
};
pub use index::{IndexBuilder, KnowledgeIndex, RetrievedChunk, Retriever, VectorStore};
pub use ingest::{DocumentFormat, DocumentLoader, SourceDocument, UploadedFile, load_documents};
pub use pipeline::{IngestReport, process_documents};
pub use qa::{Answer, NO_INDEX_PLACEHOLDER, QaOrchestrator};
