use core::result::Result as CoreResult;
use std::io::Error as IoError;
use std::path::PathBuf;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;
use toml::ser::Error as TomlSerializeError;

/// Result type for docqa operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while ingesting documents or answering questions.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// A file named by the user could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: IoError,
    },

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// TOML serialization failed.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] TomlSerializeError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required API key was not supplied.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// An uploaded file does not match the declared document format.
    #[error("{file} is not a valid {expected} file")]
    FormatMismatch {
        /// Name of the offending file.
        file: String,
        /// Format the user declared.
        expected: String,
    },

    /// A document could not be parsed.
    #[error("Failed to parse {file}: {message}")]
    Parse {
        /// Name of the offending file.
        file: String,
        /// Parser error message.
        message: String,
    },

    /// No text could be extracted from any uploaded file.
    #[error("No text could be extracted from the uploaded document(s)")]
    EmptyDocuments,

    /// The embedding service failed.
    #[error("Embedding service error: {0}")]
    Embedding(String),

    /// The completion service failed.
    #[error("Completion service error: {0}")]
    Completion(String),

    /// A remote service returned a response that could not be understood.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether repeating the action may succeed, as for network or remote service failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Embedding(_) | Self::Completion(_))
    }
}
