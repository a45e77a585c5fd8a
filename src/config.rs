use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a supportive mental health companion.";

/// Runtime configuration for the companion client
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token (`GROQ_API_KEY`)
    pub api_key: Option<String>,
    /// Endpoint base, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// System instruction preceding the user prompt
    pub system_prompt: String,
    /// JSON array of fallback messages; built-in list when unset
    pub fallback_file: Option<PathBuf>,
    /// `None` means the request may wait indefinitely.
    pub request_timeout: Option<Duration>,
    /// Append logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let request_timeout = get("COMPANION_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_key: get("GROQ_API_KEY"),
            base_url: get("COMPANION_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("COMPANION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: get("COMPANION_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            fallback_file: get("COMPANION_FALLBACK_FILE").map(PathBuf::from),
            request_timeout,
            log_file: get("COMPANION_LOG_FILE").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
