//! Anthropic Claude adapter (messages API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    secrets::ApiCredential, ChatProvider, ChatRequest, CompletionConfig, ProviderError,
};

/// Environment variable name for the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    credential: Option<ApiCredential>,
    base_url: String,
    config: CompletionConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self {
            credential: ApiCredential::from_env(ANTHROPIC_API_KEY_ENV),
            base_url: "https://api.anthropic.com/v1".to_string(),
            config,
            client,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Inject a credential directly (tests, embedding callers).
    pub fn with_credential(mut self, credential: ApiCredential) -> Self {
        self.credential = Some(credential);
        self
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let credential = self
            .credential
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::NotConfigured(ANTHROPIC_API_KEY_ENV))?;

        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: request.system.as_deref(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.prompt,
            }],
            // Zero means "leave the API default"; the wire field is omitted.
            temperature: (self.config.temperature > 0.0).then_some(self.config.temperature),
        };

        // SECURITY: the credential is exposed only here, at the call site.
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", credential.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            let error_body = response
                .json::<AnthropicError>()
                .await
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_body.error.message,
            });
        }

        let body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(content)
    }

    fn name(&self) -> &str {
        "Claude"
    }

    fn is_configured(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::secrets::CredentialSource;

    #[test]
    fn test_zero_temperature_omitted_on_wire() {
        let body = AnthropicRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 600,
            system: None,
            messages: vec![AnthropicMessage { role: "user", content: "hi" }],
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("system").is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network() {
        // Construct without touching the real env var.
        let provider = AnthropicProvider {
            credential: None,
            base_url: "https://api.anthropic.com/v1".to_string(),
            config: CompletionConfig::default(),
            client: reqwest::Client::new(),
        };
        let result = provider.complete(ChatRequest::user("hi")).await;
        assert!(matches!(
            result,
            Err(ProviderError::NotConfigured(ANTHROPIC_API_KEY_ENV))
        ));
    }

    #[test]
    fn test_credential_not_in_debug_output() {
        let provider = AnthropicProvider {
            credential: Some(ApiCredential::new("sk-ant-secret", CredentialSource::Programmatic)),
            base_url: "https://api.anthropic.com/v1".to_string(),
            config: CompletionConfig::default(),
            client: reqwest::Client::new(),
        };
        assert!(!format!("{:?}", provider).contains("sk-ant-secret"));
    }
}
