use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("fallback message collection is empty")]
    Empty,
    #[error("reading fallback messages: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing fallback messages: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Precomposed supportive messages served when no live reply is available.
///
/// Always non-empty; never mutated after construction.
#[derive(Debug, Clone)]
pub struct FallbackMessages(Vec<String>);

impl FallbackMessages {
    /// Wraps the given messages; fails on an empty list.
    pub fn new(messages: Vec<String>) -> Result<Self, FallbackError> {
        if messages.is_empty() {
            return Err(FallbackError::Empty);
        }
        Ok(Self(messages))
    }

    /// Loads a JSON array of strings.
    pub fn from_json(json: &str) -> Result<Self, FallbackError> {
        let messages: Vec<String> = serde_json::from_str(json)?;
        Self::new(messages)
    }

    /// Reads a JSON array of strings from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FallbackError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let messages = Self::from_json(&json)?;
        log::info!(
            "Loaded {} fallback messages from {}",
            messages.len(),
            path.display()
        );
        Ok(messages)
    }

    /// The messages shipped with the crate.
    pub fn builtin() -> Self {
        Self(BUILTIN.iter().map(|s| s.to_string()).collect())
    }

    /// Uniformly random message.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // non-empty by construction
        self.0
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether `message` is one of the collection's entries.
    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| m == message)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN: &[&str] = &[
    "I'm here with you. Take a slow, deep breath; you don't have to figure everything out right now.",
    "Whatever you're feeling is valid. Be as gentle with yourself as you would be with a friend.",
    "You've made it through hard days before, and you can make it through this one too.",
    "It's okay to pause. A short walk, a glass of water or a few quiet minutes can help more than you think.",
    "You don't have to carry this alone. Reaching out to someone you trust is a sign of strength.",
    "Small steps still count. Be proud of the one you're taking right now.",
    "Try naming five things you can see around you. Grounding yourself in the present can ease the noise.",
    "Your feelings are temporary visitors. They will pass, and you will still be here.",
    "If things feel overwhelming, please consider talking to a mental health professional or a local helpline.",
    "You matter, and taking care of yourself today is worth it.",
];
