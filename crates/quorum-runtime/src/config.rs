//! Runtime configuration.
//!
//! One explicit [`RuntimeConfig`] is constructed at process startup
//! (from a JSON file, or defaults) and passed by reference into the
//! pipeline. There are no module-level client singletons; credentials
//! are read from the environment when the provider set is built.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub providers: ProviderToggles,
    pub analyst: AnalystConfig,
    pub search: SearchConfig,
    pub timeouts: TimeoutConfig,
}

impl RuntimeConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Which providers participate in the fan-out.
///
/// Disabling a provider removes it from the dispatch entirely; it
/// produces no result record, unlike an enabled-but-unconfigured
/// provider, which produces an unavailable marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderToggles {
    pub openai: bool,
    pub claude: bool,
    pub gemini: bool,
    pub cohere: bool,
    pub deepseek: bool,
    pub openrouter: bool,
    pub perplexity: bool,
    pub grok: bool,
}

impl Default for ProviderToggles {
    fn default() -> Self {
        Self {
            openai: true,
            claude: true,
            gemini: true,
            cohere: true,
            deepseek: true,
            openrouter: true,
            perplexity: true,
            grok: true,
        }
    }
}

/// Configuration for the analyst provider running review passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystConfig {
    /// Model used for all three review passes.
    pub model: String,

    /// Review passes run cooler than primary queries.
    pub temperature: f32,

    /// Output ceiling per review pass.
    pub max_tokens: u32,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

/// Configuration for web search and cross-referencing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Google Custom Search engine id; falls back to the
    /// `GOOGLE_SEARCH_ENGINE_ID` environment variable when unset.
    pub engine_id: Option<String>,
}

impl SearchConfig {
    /// Resolve the engine id from config or environment.
    pub fn resolve_engine_id(&self) -> Option<String> {
        self.engine_id
            .clone()
            .or_else(|| std::env::var("GOOGLE_SEARCH_ENGINE_ID").ok())
            .filter(|id| !id.is_empty())
    }
}

/// Per-operation timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub provider_secs: u64,
    pub search_secs: u64,
    pub link_check_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            provider_secs: 30,
            search_secs: 15,
            link_check_secs: 5,
        }
    }
}

impl TimeoutConfig {
    pub fn provider(&self) -> Duration {
        Duration::from_secs(self.provider_secs)
    }

    pub fn search(&self) -> Duration {
        Duration::from_secs(self.search_secs)
    }

    pub fn link_check(&self) -> Duration {
        Duration::from_secs(self.link_check_secs)
    }
}
