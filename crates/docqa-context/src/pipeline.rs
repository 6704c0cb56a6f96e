use std::sync::Arc;
use std::time::Instant;

use docqa_core::{Error, Result};
use tokio::task;

use crate::chunking::{ChunkConfig, split_documents};
use crate::embedding::EmbeddingProvider;
use crate::index::{IndexBuilder, KnowledgeIndex};
use crate::ingest::{DocumentFormat, UploadedFile, load_documents};

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Uploaded files
    pub files: usize,
    /// Extracted documents (pages for PDF)
    pub documents: usize,
    /// Indexed chunks
    pub chunks: usize,
    /// Wall-clock time spent
    pub elapsed_ms: u64,
}

/// Loads, chunks and indexes uploaded files into a fresh knowledge index.
///
/// Parsing and chunking run on the blocking pool; embedding runs on the
/// caller's runtime.
///
/// # Errors
/// Returns the first ingestion, parsing or embedding error.
pub async fn process_documents(
    files: Vec<UploadedFile>,
    format: DocumentFormat,
    config: &ChunkConfig,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<(KnowledgeIndex, IngestReport)> {
    let start = Instant::now();
    let file_count = files.len();
    let chunk_config = config.clone();

    let (documents, chunks) = task::spawn_blocking(move || {
        let documents = load_documents(&files, format)?;
        let chunks = split_documents(&documents, &chunk_config);
        Ok::<_, Error>((documents.len(), chunks))
    })
    .await
    .map_err(|err| Error::Other(format!("Ingestion task failed: {err}")))??;

    let chunk_count = chunks.len();
    let index = IndexBuilder::new(embedder).build(chunks).await?;

    let report = IngestReport {
        files: file_count,
        documents,
        chunks: chunk_count,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    tracing::info!(
        files = report.files,
        documents = report.documents,
        chunks = report.chunks,
        elapsed_ms = report.elapsed_ms,
        format = %format,
        "Processed documents"
    );

    Ok((index, report))
}
