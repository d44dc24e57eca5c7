//! Completion service: one chat request in, one text completion out.
//!
//! [`CompletionService`] is the seam between the pipeline and the hosted
//! model. Production code uses [`ChatCompletionClient`], which speaks the
//! OpenAI-compatible `/chat/completions` protocol that Groq exposes; tests
//! substitute their own implementation.
//!
//! A single attempt is made per request. Failures surface immediately as
//! [`BrdError::Upstream`] and are never retried.

use crate::config::{AnalyzerConfig, API_KEY_VAR};
use crate::error::BrdError;
use crate::pipeline::repair::compact_preview;
use crate::prompts::{build_user_prompt, SYSTEM_PROMPT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Everything needed for one non-streaming chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build the BRD analysis request for a document.
    pub fn for_document(document_text: &str, config: &AnalyzerConfig) -> Self {
        Self {
            model: config.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user: build_user_prompt(document_text, config.max_document_chars),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A hosted model that turns a chat request into completion text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Return the text content of the single completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BrdError>;
}

// ── OpenAI-compatible wire format ────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

/// Client for an OpenAI-compatible chat completions endpoint (Groq by default).
///
/// The credential is checked on every call, before anything is sent, so a
/// server started without one still answers health checks and reports the
/// missing key per request.
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Full URL of the completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BrdError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(BrdError::MissingApiKey { var: API_KEY_VAR })?;

        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let start = Instant::now();
        info!(
            "Requesting completion from {} (model {})",
            self.base_url, request.model
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BrdError::Upstream {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BrdError::Upstream {
                message: format!("HTTP {}: {}", status, compact_preview(&text)),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| BrdError::Upstream {
            message: format!("unreadable completion response: {e}"),
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "{} prompt tokens, {} completion tokens, {:?}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                start.elapsed()
            );
        }

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
