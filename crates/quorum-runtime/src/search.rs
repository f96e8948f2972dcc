//! Web search context client.
//!
//! Fetches current search results to prepend to provider prompts.
//! Tavily first (tuned for LLM consumption), Google Custom Search as
//! fallback. Context is best-effort: every failure path degrades to
//! `None` and the pipeline proceeds without augmentation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RuntimeConfig;
use crate::providers::secrets::ApiCredential;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const MAX_SEARCH_RESULTS: usize = 5;

const CONTEXT_HEADER: &str =
    "CURRENT WEB SEARCH RESULTS (use this for up-to-date information):\n\n";

/// Client for context-augmentation searches.
pub struct SearchClient {
    client: reqwest::Client,
    tavily: Option<ApiCredential>,
    google: Option<ApiCredential>,
    engine_id: Option<String>,
    timeout: Duration,
}

impl SearchClient {
    pub fn from_config(config: &RuntimeConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            tavily: ApiCredential::from_env("TAVILY_API_KEY"),
            google: ApiCredential::from_env("GOOGLE_API_KEY"),
            engine_id: config.search.resolve_engine_id(),
            timeout: config.timeouts.search(),
        }
    }

    /// Whether any search backend is configured.
    pub fn is_available(&self) -> bool {
        self.tavily.is_some() || (self.google.is_some() && self.engine_id.is_some())
    }

    /// Fetch formatted search context for a query, or `None`.
    pub async fn web_context(&self, query: &str) -> Option<String> {
        if let Some(tavily) = &self.tavily {
            match self.tavily_context(tavily, query).await {
                Ok(context) => return Some(context),
                Err(e) => tracing::warn!(error = %e, "tavily search failed"),
            }
        }

        if let (Some(google), Some(engine_id)) = (&self.google, &self.engine_id) {
            match self.google_context(google, engine_id, query).await {
                Ok(Some(context)) => return Some(context),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "google search failed"),
            }
        }

        None
    }

    async fn tavily_context(
        &self,
        credential: &ApiCredential,
        query: &str,
    ) -> Result<String, reqwest::Error> {
        let body = TavilyRequest {
            api_key: credential.expose(),
            query,
            search_depth: "basic",
            max_results: MAX_SEARCH_RESULTS,
            include_answer: true,
        };

        let response = self
            .client
            .post(TAVILY_ENDPOINT)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let data: TavilyResponse = response.json().await?;

        let mut context = String::from(CONTEXT_HEADER);
        if let Some(answer) = data.answer.filter(|a| !a.is_empty()) {
            context.push_str(&format!("DIRECT ANSWER: {}\n\n", answer));
        }
        for (i, result) in data.results.iter().take(MAX_SEARCH_RESULTS).enumerate() {
            context.push_str(&format!("{}. {}\n   {}\n", i + 1, result.title, result.content));
            if !result.url.is_empty() {
                context.push_str(&format!("   Source: {}\n", result.url));
            }
            context.push('\n');
        }

        Ok(context)
    }

    async fn google_context(
        &self,
        credential: &ApiCredential,
        engine_id: &str,
        query: &str,
    ) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(GOOGLE_SEARCH_ENDPOINT)
            .query(&[
                ("key", credential.expose()),
                ("cx", engine_id),
                ("q", query),
                ("num", "5"),
            ])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let data: GoogleSearchResponse = response.json().await?;
        if data.items.is_empty() {
            return Ok(None);
        }

        let mut context = String::from(CONTEXT_HEADER);
        for (i, item) in data.items.iter().take(MAX_SEARCH_RESULTS).enumerate() {
            context.push_str(&format!("{}. {}\n   {}\n", i + 1, item.title, item.snippet));
            if !item.link.is_empty() {
                context.push_str(&format!("   Source: {}\n", item.link));
            }
            context.push('\n');
        }

        Ok(Some(context))
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

/// Google Custom Search response shape, shared with the
/// truth-verification cross-reference query.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleSearchResponse {
    #[serde(default)]
    pub(crate) items: Vec<GoogleSearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleSearchItem {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) snippet: String,
    #[serde(default)]
    pub(crate) link: String,
}
