//! Configuration for the completion and embedding services, chunking, retrieval and UI.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default base URL for OpenAI-compatible endpoints.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Complete application configuration.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Completion service settings
    pub completion: CompletionConfig,
    /// Embedding service settings
    pub embedding: EmbeddingConfig,
    /// Chunking settings
    pub chunking: ChunkingConfig,
    /// Retrieval settings
    pub retrieval: RetrievalConfig,
    /// Interface settings
    pub ui: UiConfig,
}

/// Completion service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Maximum tokens to generate per answer
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// HTTP timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            model: "gpt-3.5-turbo".to_owned(),
            max_tokens: 512,
            temperature: 0.0,
            timeout_seconds: 120,
        }
    }
}

/// Which embedding service to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/embeddings` endpoint, authenticated with the session key
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

/// Embedding service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding backend
    pub backend: EmbeddingBackend,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Embedding model name for the OpenAI backend
    pub model: String,
    /// Number of chunks sent per embedding request
    pub batch_size: usize,
    /// Ollama host URL
    pub ollama_host: String,
    /// Ollama port
    pub ollama_port: u16,
    /// Embedding model name for the Ollama backend
    pub ollama_model: String,
    /// HTTP timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::OpenAi,
            base_url: DEFAULT_OPENAI_BASE_URL.to_owned(),
            model: "text-embedding-ada-002".to_owned(),
            batch_size: 100,
            ollama_host: "http://localhost".to_owned(),
            ollama_port: 11434,
            ollama_model: "nomic-embed-text".to_owned(),
            timeout_seconds: 120,
        }
    }
}

/// Chunking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Separator used to split text before merging into chunks
    pub separator: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            separator: "\n\n".to_owned(),
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
    /// Whether follow-up questions are rephrased into standalone questions using chat history
    pub rephrase_question: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            rephrase_question: true,
        }
    }
}

/// Interface configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "TokyoNight".to_owned(),
        }
    }
}

impl AppConfig {
    /// Get the default config directory path (`~/.docqa`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".docqa"))
    }

    /// Get the default config file path (`~/.docqa/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from `path`, creating it with default values if it does not exist
    ///
    /// # Errors
    /// Returns an error if the config cannot be read, parsed, validated or created
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            let config = Self::default();
            config.save_to_file(path)?;
            tracing::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        tracing::debug!(
            "Loaded config from {}: completion_model={}, embedding_backend={:?}, chunk_size={}",
            path.display(),
            config.completion.model,
            config.embedding.backend,
            config.chunking.chunk_size
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;

        let header = "# docqa configuration file\n\
                      # This file is automatically generated on first run\n\
                      # The API key is entered in the interface and is never stored here\n\n";

        fs::write(path, format!("{header}{contents}"))?;

        Ok(())
    }

    /// Checks values that would make ingestion or retrieval impossible.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".to_owned()));
        }
        if self.chunking.separator.is_empty() {
            return Err(Error::Config(
                "chunking.separator must not be empty".to_owned(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".to_owned()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::Config("embedding.batch_size must be > 0".to_owned()));
        }
        Ok(())
    }
}
