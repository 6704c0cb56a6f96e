//! Provider adapters for hosted completion services.
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

/// Scriptable provider for tests.
pub mod mock;
/// OpenAI-compatible chat completions provider.
pub mod openai;

pub use mock::{MockProvider, RecordedCall};
pub use openai::OpenAiProvider;
