pub mod fallback;
pub mod groq;

use async_trait::async_trait;
use thiserror::Error;

pub use fallback::{FallbackError, FallbackMessages};
pub use groq::GroqClient;

/// Why a remote completion could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response contained no choices")]
    NoChoices,
}

/// Sends a `system` instruction followed by a `user` prompt to a chat model
/// and returns the assistant's text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

