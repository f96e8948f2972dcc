//! Cohere adapter (chat API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    secrets::ApiCredential, ChatProvider, ChatRequest, CompletionConfig, ProviderError,
};

/// Environment variable name for the Cohere API key.
pub const COHERE_API_KEY_ENV: &str = "COHERE_API_KEY";

/// Cohere provider.
pub struct CohereProvider {
    credential: Option<ApiCredential>,
    base_url: String,
    config: CompletionConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for CohereProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereProvider")
            .field("credential", &self.credential)
            .field("model", &self.config.model)
            .finish()
    }
}

impl CohereProvider {
    pub fn new(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self {
            credential: ApiCredential::from_env(COHERE_API_KEY_ENV),
            base_url: "https://api.cohere.ai/v1".to_string(),
            config,
            client,
        }
    }

    /// Inject a credential directly (tests, embedding callers).
    pub fn with_credential(mut self, credential: ApiCredential) -> Self {
        self.credential = Some(credential);
        self
    }
}

#[derive(Debug, Serialize)]
struct CohereChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<&'a str>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CohereChatResponse {
    text: String,
}

#[async_trait]
impl ChatProvider for CohereProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let credential = self
            .credential
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::NotConfigured(COHERE_API_KEY_ENV))?;

        let body = CohereChatRequest {
            model: &self.config.model,
            message: &request.prompt,
            preamble: request.system.as_deref(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        // SECURITY: the credential is exposed only here, at the call site.
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
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

        let body: CohereChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.text)
    }

    fn name(&self) -> &str {
        "Cohere"
    }

    fn is_configured(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }
}
