//! Core types and traits for docqa.
//!
//! This crate provides the error type, the shared request/response types,
//! the model provider trait, configuration loading and the per-user session
//! state used across the docqa workspace.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

/// Application configuration loaded from `config.toml`.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Per-user session state: credential and chat transcript.
pub mod session;
/// Synchronization helpers.
pub mod sync;
/// Trait definitions for model providers.
pub mod traits;
/// Core data types for queries, responses, and context.
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::{ApiKey, ChatTurn, Session};
pub use sync::IgnoreLock;
pub use traits::ModelProvider;
pub use types::{Context, Passage, Query, Response, TokenUsage};
