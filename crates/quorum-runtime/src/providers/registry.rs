//! Fixed provider roster construction.
//!
//! The eight primary adapters and the analyst are built once at
//! startup from [`RuntimeConfig`] and a shared HTTP client. The roster
//! is fixed; runtime configuration only toggles membership and tunes
//! the analyst.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RuntimeConfig;

use super::{
    AnthropicProvider, ChatProvider, CohereProvider, CompletionConfig, GeminiProvider,
    OpenAiCompatProvider,
};

const HELPFUL_ASSISTANT: &str = "You are a helpful assistant.";
const HELPFUL_ASSISTANT_CURRENT: &str =
    "You are a helpful assistant with access to current information.";

fn completion(model: &str, temperature: f32, timeout: Duration) -> CompletionConfig {
    CompletionConfig {
        model: model.to_string(),
        max_tokens: 600,
        temperature,
        timeout,
    }
}

/// Build the enabled primary providers, in roster order.
///
/// Adapters whose credential is absent are still included: they
/// produce unavailable markers, keeping the result-set cardinality
/// equal to the enabled-provider count.
pub fn build_providers(
    config: &RuntimeConfig,
    client: &reqwest::Client,
) -> Vec<Arc<dyn ChatProvider>> {
    let toggles = &config.providers;
    let timeout = config.timeouts.provider();
    let mut providers: Vec<Arc<dyn ChatProvider>> = Vec::new();

    if toggles.openai {
        providers.push(Arc::new(
            OpenAiCompatProvider::new(
                client.clone(),
                "OpenAI",
                "OPENAI_API_KEY",
                "https://api.openai.com/v1",
                completion("gpt-4o", 0.5, timeout),
            )
            .with_system_prompt(HELPFUL_ASSISTANT_CURRENT),
        ));
    }

    if toggles.claude {
        providers.push(Arc::new(AnthropicProvider::new(
            client.clone(),
            completion("claude-3-haiku-20240307", 0.0, timeout),
        )));
    }

    if toggles.gemini {
        providers.push(Arc::new(GeminiProvider::new(
            client.clone(),
            completion("gemini-2.0-flash", 0.5, timeout),
        )));
    }

    if toggles.cohere {
        providers.push(Arc::new(CohereProvider::new(
            client.clone(),
            completion("command-r-08-2024", 0.5, timeout),
        )));
    }

    if toggles.deepseek {
        providers.push(Arc::new(
            OpenAiCompatProvider::new(
                client.clone(),
                "DeepSeek",
                "DEEPSEEK_API_KEY",
                "https://api.deepseek.com",
                completion("deepseek-chat", 0.5, timeout),
            )
            .with_system_prompt(HELPFUL_ASSISTANT),
        ));
    }

    if toggles.openrouter {
        providers.push(Arc::new(
            OpenAiCompatProvider::new(
                client.clone(),
                "OpenRouter",
                "OPENROUTER_API_KEY",
                "https://openrouter.ai/api/v1",
                completion("microsoft/wizardlm-2-8x22b", 0.5, timeout),
            )
            .with_system_prompt(HELPFUL_ASSISTANT),
        ));
    }

    if toggles.perplexity {
        providers.push(Arc::new(OpenAiCompatProvider::new(
            client.clone(),
            "Perplexity",
            "PERPLEXITY_API_KEY",
            "https://api.perplexity.ai",
            completion("sonar", 0.5, timeout),
        )));
    }

    if toggles.grok {
        let model = std::env::var("GROK_MODEL_NAME").unwrap_or_else(|_| "grok-beta".to_string());
        providers.push(Arc::new(OpenAiCompatProvider::new(
            client.clone(),
            "Grok",
            "GROK_API_KEY",
            "https://api.x.ai/v1",
            completion(&model, 0.5, timeout),
        )));
    }

    providers
}

/// Build the analyst provider used by the review pass engine.
pub fn build_analyst(config: &RuntimeConfig, client: &reqwest::Client) -> Arc<dyn ChatProvider> {
    Arc::new(OpenAiCompatProvider::new(
        client.clone(),
        "Analyst",
        "OPENAI_API_KEY",
        "https://api.openai.com/v1",
        CompletionConfig {
            model: config.analyst.model.clone(),
            max_tokens: config.analyst.max_tokens,
            temperature: config.analyst.temperature,
            timeout: config.timeouts.provider(),
        },
    ))
}
