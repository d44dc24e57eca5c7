//! Configuration types for BRD analysis.
//!
//! Report generation is controlled through [`AnalyzerConfig`], built via its
//! [`AnalyzerConfigBuilder`] or read from the process environment with
//! [`AnalyzerConfig::from_env`]. The HTTP listener has its own small
//! [`ServerConfig`].
//!
//! Both are immutable once built and shared behind an `Arc`, so no request
//! ever observes configuration changing underneath it.

use crate::error::BrdError;
use std::fmt;

/// Environment variable holding the completion service credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Default OpenAI-compatible endpoint of the completion service.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for generating a BRD analysis from document text.
///
/// # Example
/// ```rust
/// use brd_analyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .model("llama-3.3-70b-versatile")
///     .temperature(0.1)
///     .api_key("gsk_test")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 4096);
/// ```
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Model identifier sent with every completion request.
    pub model: String,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Kept low so the model sticks to the requested JSON shape.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    pub max_tokens: u32,

    /// Maximum number of document characters embedded in the prompt. Default: 120 000.
    ///
    /// Longer documents are truncated to stay inside the model's context window.
    pub max_document_chars: usize,

    /// Completion service credential. `None` is reported per request as
    /// [`BrdError::MissingApiKey`], before any network call.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            max_document_chars: 120_000,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_document_chars", &self.max_document_chars)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnalyzerConfig {
    /// Create a new builder for `AnalyzerConfig`.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the configuration from the environment.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `GROQ_API_KEY` | `api_key` (empty counts as unset) |
    /// | `GROQ_BASE_URL` | `base_url` |
    /// | `BRD_MODEL` | `model` |
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_var(API_KEY_VAR);
        if let Some(url) = non_empty_var("GROQ_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = non_empty_var("BRD_MODEL") {
            config.model = model;
        }
        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_document_chars(mut self, n: usize) -> Self {
        self.config.max_document_chars = n;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_key_opt(mut self, key: Option<String>) -> Self {
        self.config.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalyzerConfig, BrdError> {
        let c = &self.config;
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(BrdError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.max_tokens == 0 {
            return Err(BrdError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.max_document_chars == 0 {
            return Err(BrdError::InvalidConfig(
                "max_document_chars must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(BrdError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}

/// Settings for the HTTP listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub addr: String,

    /// Largest accepted request body in bytes. Default: 25 MiB.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}
