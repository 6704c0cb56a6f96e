//! Background jobs for ingestion and answering.
//!
//! Jobs run on a tokio task with owned inputs and report exactly one
//! [`JobOutcome`] back to the event loop over an unbounded channel.

use std::sync::Arc;

use docqa_context::{
    Answer, ChunkConfig, EmbeddingProvider, IngestReport, KnowledgeIndex, QaOrchestrator,
    Retriever, UploadedFile, build_embedding_provider, process_documents,
};
use docqa_core::{ApiKey, AppConfig, Error, ModelProvider, Result};
use docqa_providers::OpenAiProvider;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::state::JobRequest;

/// Result of a finished job
#[derive(Debug)]
pub enum JobOutcome {
    /// Ingestion finished
    Ingested(Result<(KnowledgeIndex, IngestReport)>),
    /// Answering finished for `question`
    Answered {
        /// Question the answer belongs to
        question: String,
        /// Answer or failure
        result: Result<Answer>,
    },
}

impl JobOutcome {
    /// Outcome for a request that failed before it could run.
    pub fn failed(request: JobRequest, error: Error) -> Self {
        match request {
            JobRequest::Ingest { .. } => Self::Ingested(Err(error)),
            JobRequest::Answer { question, .. } => Self::Answered {
                question,
                result: Err(error),
            },
        }
    }
}

/// Builds the remote service clients for a job.
pub trait ServiceFactory: Send + Sync {
    /// Embedding client authenticated with `api_key`.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built.
    fn embedder(&self, api_key: &ApiKey) -> Result<Arc<dyn EmbeddingProvider>>;

    /// Completion client authenticated with `api_key`.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built.
    fn completion(&self, api_key: &ApiKey) -> Result<Arc<dyn ModelProvider>>;
}

/// OpenAI-compatible services configured from [`AppConfig`].
pub struct RemoteServices {
    config: Arc<AppConfig>,
}

impl RemoteServices {
    /// Creates a factory for the configured endpoints.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl ServiceFactory for RemoteServices {
    fn embedder(&self, api_key: &ApiKey) -> Result<Arc<dyn EmbeddingProvider>> {
        build_embedding_provider(&self.config.embedding, api_key)
    }

    fn completion(&self, api_key: &ApiKey) -> Result<Arc<dyn ModelProvider>> {
        let provider: Arc<dyn ModelProvider> =
            Arc::new(OpenAiProvider::new(api_key.clone(), &self.config.completion)?);
        Ok(provider)
    }
}

/// Spawns jobs and forwards their outcomes to the event loop.
pub struct JobRunner {
    services: Arc<dyn ServiceFactory>,
    config: Arc<AppConfig>,
    sender: mpsc::UnboundedSender<JobOutcome>,
}

impl JobRunner {
    /// Creates a runner that reports on `sender`.
    pub fn new(
        services: Arc<dyn ServiceFactory>,
        config: Arc<AppConfig>,
        sender: mpsc::UnboundedSender<JobOutcome>,
    ) -> Self {
        Self {
            services,
            config,
            sender,
        }
    }

    /// Runs `request` on a tokio task authenticated with `api_key`.
    pub fn spawn(&self, request: JobRequest, api_key: ApiKey) -> JoinHandle<()> {
        let services = Arc::clone(&self.services);
        let config = Arc::clone(&self.config);
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let outcome = run_job(request, &api_key, services.as_ref(), &config).await;
            if sender.send(outcome).is_err() {
                tracing::debug!("Job finished after the event loop stopped");
            }
        })
    }
}

/// Executes one job to completion.
pub async fn run_job(
    request: JobRequest,
    api_key: &ApiKey,
    services: &dyn ServiceFactory,
    config: &AppConfig,
) -> JobOutcome {
    match request {
        JobRequest::Ingest { paths, format } => {
            let result = async {
                let mut files = Vec::with_capacity(paths.len());
                for path in &paths {
                    files.push(UploadedFile::from_path(path).await?);
                }
                let embedder = services.embedder(api_key)?;
                process_documents(files, format, &ChunkConfig::from(&config.chunking), embedder).await
            }
            .await;
            JobOutcome::Ingested(result)
        }
        JobRequest::Answer {
            question,
            index,
            history,
        } => {
            let result = async {
                let provider = services.completion(api_key)?;
                let qa = QaOrchestrator::from_config(provider, &config.retrieval);
                let retriever: &dyn Retriever = index.as_ref();
                qa.answer(Some(retriever), &question, &history).await
            }
            .await;
            JobOutcome::Answered { question, result }
        }
    }
}
