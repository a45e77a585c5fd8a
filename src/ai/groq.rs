use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ChatBackend, CompletionError};
use crate::config::Config;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for OpenAI-compatible chat-completions endpoints (Groq by default).
///
/// One request per call: no history, no retries, no streaming.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    url: String,
}

impl GroqClient {
    /// Creates a client; a missing or empty key makes every call fail with `MissingApiKey`.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("building HTTP client")?;

        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.into(),
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            &config.base_url,
            config.request_timeout,
        )
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full chat-completions endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turns a raw HTTP status and body into the first choice's text.
fn parse_response(status: StatusCode, body: &str) -> Result<String, CompletionError> {
    if !status.is_success() {
        return Err(CompletionError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(CompletionError::NoChoices)
}

#[async_trait]
impl ChatBackend for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };

        log::debug!("POST {} (model {})", self.url, self.model);

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            log::error!("Chat API error ({}): {}", status, body);
        }

        parse_response(status, &body)
    }
}
