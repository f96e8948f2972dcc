//! Provider abstractions for the Quorum fan-out core.
//!
//! One adapter per external model provider, all behind [`ChatProvider`].
//! Five providers speak the OpenAI-compatible chat-completions wire
//! format and share a single parameterized adapter; Anthropic, Gemini,
//! and Cohere have their own wire formats.
//!
//! ## Security
//!
//! All adapters use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the patterns.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

mod anthropic;
mod cohere;
mod gemini;
mod openai_compat;
mod registry;
pub mod secrets;

pub use anthropic::AnthropicProvider;
pub use cohere::CohereProvider;
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use registry::{build_analyst, build_providers};
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from provider adapters.
///
/// These never cross the dispatcher boundary: the fan-out layer
/// converts every variant into an in-band [`ProviderResult`]
/// diagnostic.
///
/// [`ProviderResult`]: quorum_core::ProviderResult
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Credential absent: the named environment variable is not set.
    #[error("{0} not set")]
    NotConfigured(&'static str),
}

/// Fixed per-provider completion parameters.
///
/// These are configured once per adapter at startup and are not
/// query-configurable.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model identifier in the provider's namespace.
    pub model: String,

    /// Output token ceiling.
    pub max_tokens: u32,

    /// Sampling temperature. Adapters whose API defaults differ may
    /// omit a zero temperature on the wire.
    pub temperature: f32,

    /// Request timeout; on expiry the call degrades to an in-band
    /// error result like any other transport failure.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 600,
            temperature: 0.5,
            timeout: Duration::from_secs(30),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System prompt override; falls back to the adapter's configured
    /// default when `None`.
    pub system: Option<String>,

    /// The full user prompt (context already prepended).
    pub prompt: String,
}

impl ChatRequest {
    /// A plain user request with no system override.
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    /// Attach a system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Provider abstraction allows swapping model backends.
///
/// Adapters return the raw answer text; all normalization into
/// [`ProviderResult`] records happens in the dispatcher, which is the
/// only caller for primary queries.
///
/// [`ProviderResult`]: quorum_core::ProviderResult
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Execute a chat completion.
    ///
    /// Must return `Err(ProviderError::NotConfigured)` immediately,
    /// without any network call, when the credential is absent.
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError>;

    /// Display name used in result records and diagnostics.
    fn name(&self) -> &str;

    /// Whether a usable credential is present.
    fn is_configured(&self) -> bool;
}
