//! Shared adapter for OpenAI-compatible chat-completions APIs.
//!
//! OpenAI, DeepSeek, OpenRouter, Perplexity, and Grok all speak the
//! same `/chat/completions` wire format and differ only in endpoint,
//! model, and credential. One adapter parameterized by configuration
//! covers all of them; there is no per-provider subclassing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    secrets::ApiCredential, ChatProvider, ChatRequest, CompletionConfig, ProviderError,
};

/// Adapter for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatProvider {
    name: String,
    env_var: &'static str,
    credential: Option<ApiCredential>,
    base_url: String,
    system_prompt: Option<String>,
    config: CompletionConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.name)
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiCompatProvider {
    /// Create an adapter for one endpoint. The credential is read from
    /// `env_var` once, here; absence makes the adapter report itself
    /// unconfigured.
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        env_var: &'static str,
        base_url: impl Into<String>,
        config: CompletionConfig,
    ) -> Self {
        Self {
            name: name.into(),
            env_var,
            credential: ApiCredential::from_env(env_var),
            base_url: base_url.into(),
            system_prompt: None,
            config,
            client,
        }
    }

    /// Default system prompt sent when a request carries none.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Inject a credential directly (tests, embedding callers).
    pub fn with_credential(mut self, credential: ApiCredential) -> Self {
        self.credential = Some(credential);
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let credential = self
            .credential
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::NotConfigured(self.env_var))?;

        let system = request.system.as_deref().or(self.system_prompt.as_deref());
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        // SECURITY: the credential is exposed only here, at the call site.
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(credential.expose())
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("response carried no choices".to_string()))?;

        Ok(content)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }
}
