//! Google Gemini adapter (generateContent API).
//!
//! Gemini authenticates via a `key` query parameter rather than a
//! header, and shares its credential with Google Custom Search
//! (`GOOGLE_API_KEY`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    secrets::ApiCredential, ChatProvider, ChatRequest, CompletionConfig, ProviderError,
};

/// Environment variable name for the Google API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Google Gemini provider.
pub struct GeminiProvider {
    credential: Option<ApiCredential>,
    base_url: String,
    config: CompletionConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("credential", &self.credential)
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self {
            credential: ApiCredential::from_env(GOOGLE_API_KEY_ENV),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
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
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let credential = self
            .credential
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::NotConfigured(GOOGLE_API_KEY_ENV))?;

        // Gemini has no separate system role here; fold any system text
        // into the single user turn.
        let prompt = match request.system.as_deref() {
            Some(system) => format!("{}\n\n{}", system, request.prompt),
            None => request.prompt,
        };

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        );

        // SECURITY: the credential is exposed only here, at the call site.
        let response = self
            .client
            .post(url)
            .query(&[("key", credential.expose())])
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

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response carried no candidates".to_string()))?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(content)
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }
}
