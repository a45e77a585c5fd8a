//! Supportive companion messages: a chat-completions call with a local fallback.

pub mod ai;
pub mod config;
pub mod logger;
pub mod provider;

pub use ai::{ChatBackend, CompletionError, FallbackMessages, GroqClient};
pub use config::Config;
pub use provider::{FallbackReason, MessageProvider, Reply};
