use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::{ChatBackend, CompletionError, FallbackMessages};
use crate::config::DEFAULT_SYSTEM_PROMPT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Caller declared itself offline; no request was made.
    Offline,
    Remote(CompletionError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Offline => write!(f, "offline"),
            FallbackReason::Remote(err) => write!(f, "{}", err),
        }
    }
}

/// Outcome of [`MessageProvider::get_message`]. The text is always usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Remote(String),
    Fallback { text: String, reason: FallbackReason },
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Remote(text) => text,
            Reply::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Remote(text) => text,
            Reply::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Reply::Fallback { .. })
    }
}

/// Answers a prompt from a chat backend, or from the fallback collection when
/// offline or when the backend fails.
pub struct MessageProvider {
    backend: Box<dyn ChatBackend>,
    fallbacks: FallbackMessages,
    system_prompt: String,
    rng: Mutex<StdRng>,
}

impl MessageProvider {
    pub fn new(backend: impl ChatBackend + 'static, fallbacks: FallbackMessages) -> Self {
        Self::with_rng(backend, fallbacks, StdRng::from_entropy())
    }

    /// Same as [`MessageProvider::new`] with a caller-supplied RNG for fallback selection.
    pub fn with_rng(
        backend: impl ChatBackend + 'static,
        fallbacks: FallbackMessages,
        rng: StdRng,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            fallbacks,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn fallbacks(&self) -> &FallbackMessages {
        &self.fallbacks
    }

    /// Online request; equivalent to `get_message_with(prompt, true)`.
    pub async fn get_message(&self, prompt: &str) -> Reply {
        self.get_message_with(prompt, true).await
    }

    pub async fn get_message_with(&self, prompt: &str, is_online: bool) -> Reply {
        if !is_online {
            log::info!("Offline mode active: picking fallback message");
            return self.fallback(FallbackReason::Offline);
        }

        match self.backend.complete(&self.system_prompt, prompt).await {
            Ok(text) => Reply::Remote(text),
            Err(CompletionError::MissingApiKey) => {
                log::warn!("No API key configured, using fallback message");
                self.fallback(FallbackReason::Remote(CompletionError::MissingApiKey))
            }
            Err(err) => {
                match &err {
                    // body already logged by the backend
                    CompletionError::Status { status, .. } => log::warn!(
                        "AI integration failed with status {}, using fallback message",
                        status
                    ),
                    other => log::warn!("AI integration failed: {}, using fallback message", other),
                }
                self.fallback(FallbackReason::Remote(err))
            }
        }
    }

    fn fallback(&self, reason: FallbackReason) -> Reply {
        // Never held across an await.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let text = self.fallbacks.pick(&mut *rng).to_string();
        Reply::Fallback { text, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Panicking;

    #[async_trait]
    impl ChatBackend for Panicking {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            panic!("offline path must not reach the backend");
        }
    }

    struct Counting {
        calls: Arc<AtomicUsize>,
        result: Result<String, CompletionError>,
    }

    #[async_trait]
    impl ChatBackend for Counting {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn messages() -> FallbackMessages {
        FallbackMessages::new(vec!["stay calm".to_string(), "you matter".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn offline_skips_backend() {
        let provider = MessageProvider::new(Panicking, messages());
        let reply = provider.get_message_with("I feel anxious", false).await;
        assert!(provider.fallbacks().contains(reply.text()));
        assert!(matches!(
            reply,
            Reply::Fallback {
                reason: FallbackReason::Offline,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failure_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = Counting {
            calls: calls.clone(),
            result: Err(CompletionError::Transport("connection reset".into())),
        };
        let provider = MessageProvider::new(backend, messages());

        let reply = provider.get_message("Hello").await;
        assert!(reply.is_fallback());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn seeded_rng_is_deterministic() {
        let a = MessageProvider::with_rng(Panicking, messages(), StdRng::seed_from_u64(3));
        let b = MessageProvider::with_rng(Panicking, messages(), StdRng::seed_from_u64(3));
        for _ in 0..20 {
            assert_eq!(
                a.get_message_with("x", false).await,
                b.get_message_with("x", false).await
            );
        }
    }

    #[test]
    fn reason_display() {
        assert_eq!(FallbackReason::Offline.to_string(), "offline");
        assert_eq!(
            FallbackReason::Remote(CompletionError::Status {
                status: 500,
                body: "oops".into()
            })
            .to_string(),
            "API returned 500: oops"
        );
    }
}
