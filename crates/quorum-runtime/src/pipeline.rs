//! End-to-end query pipeline.
//!
//! Wires the fan-out dispatcher, review engine, composite scorer, and
//! truth verification together for one request/response cycle. All
//! per-query state is local to one `run` call; the pipeline itself
//! holds only configuration and clients.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use quorum_core::{
    compute_h_score, HScore, ProviderResult, Query, ReviewKind, ReviewSet, VerificationReport,
};

use crate::config::RuntimeConfig;
use crate::dispatch::dispatch_all;
use crate::providers::{build_analyst, build_providers, ChatProvider};
use crate::review::{ReviewEngine, ReviewToggles};
use crate::search::SearchClient;
use crate::verify::TruthVerificationEngine;

/// Errors rejecting an invocation before dispatch begins.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("query must not be empty")]
    EmptyQuery,
}

/// Per-invocation feature toggles.
///
/// A disabled stage yields `None` for its output field without
/// affecting the other stages.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub adversarial_review: bool,
    pub defensive_review: bool,
    pub synthesis_review: bool,
    pub web_search: bool,
    pub truth_verification: bool,

    /// Uploaded-file text to prepend, supplied by the caller.
    pub file_context: Option<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            adversarial_review: true,
            defensive_review: true,
            synthesis_review: true,
            web_search: true,
            truth_verification: true,
            file_context: None,
        }
    }
}

/// The complete response shape for one query.
///
/// Always fully populated for a successful run: disabled or failed
/// sub-analyses surface as `None` or neutral defaults, never as a
/// partial response.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    /// One entry per enabled provider, in completion order.
    pub responses: Vec<ProviderResult>,

    pub h_score: Option<HScore>,

    #[serde(rename = "team_analysis")]
    pub reviews: Option<ReviewSet>,

    pub verification: Option<VerificationReport>,

    pub web_search_used: bool,
}

/// The parallel multi-provider query/aggregation/scoring pipeline.
pub struct QueryPipeline {
    providers: Vec<Arc<dyn ChatProvider>>,
    review: ReviewEngine,
    verifier: TruthVerificationEngine,
    search: SearchClient,
}

impl QueryPipeline {
    /// Build the full pipeline from configuration: the provider
    /// roster, the analyst, and one shared HTTP client.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let client = reqwest::Client::new();
        let providers = build_providers(config, &client);
        let analyst = build_analyst(config, &client);
        Self::new(providers, analyst, config, client)
    }

    /// Assemble a pipeline from explicit parts. Useful for embedding
    /// and for tests with scripted providers.
    pub fn new(
        providers: Vec<Arc<dyn ChatProvider>>,
        analyst: Arc<dyn ChatProvider>,
        config: &RuntimeConfig,
        client: reqwest::Client,
    ) -> Self {
        Self {
            providers,
            review: ReviewEngine::new(analyst),
            verifier: TruthVerificationEngine::from_config(config, client.clone()),
            search: SearchClient::from_config(config, client),
        }
    }

    /// Run one query through the pipeline.
    ///
    /// Rejects invalid input before dispatch; after that, every
    /// failure is contained and the caller receives a complete
    /// [`QueryOutcome`].
    pub async fn run(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> Result<QueryOutcome, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        tracing::debug!(providers = self.providers.len(), "dispatching query");

        let web_context = if options.web_search && self.search.is_available() {
            self.search.web_context(query).await
        } else {
            None
        };
        let web_search_used = web_context.is_some();

        let context = match (web_context, options.file_context.clone()) {
            (Some(web), Some(file)) => Some(format!("{web}\n\n{file}")),
            (Some(web), None) => Some(web),
            (None, Some(file)) => Some(file),
            (None, None) => None,
        };

        let dispatch_query = Query::new(query).with_context(context);
        let responses = dispatch_all(&dispatch_query, &self.providers).await;

        let toggles = ReviewToggles {
            adversarial: options.adversarial_review,
            defensive: options.defensive_review,
            synthesis: options.synthesis_review,
        };

        // Review passes and truth verification are independent
        // consumers of the same primary result set.
        let (reviews, verification) = tokio::join!(
            async {
                if toggles.any() {
                    Some(self.review.run(query, &responses, &toggles).await)
                } else {
                    None
                }
            },
            async {
                if options.truth_verification {
                    Some(self.verifier.verify(query, &responses).await)
                } else {
                    None
                }
            },
        );

        let empty = ReviewSet::default();
        let review_set = reviews.as_ref().unwrap_or(&empty);
        let h_score = compute_h_score(
            &responses,
            review_set.text_of(ReviewKind::Adversarial),
            review_set.text_of(ReviewKind::Defensive),
            review_set.text_of(ReviewKind::Synthesis),
        );

        Ok(QueryOutcome {
            responses,
            h_score: Some(h_score),
            reviews,
            verification,
            web_search_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatRequest, ProviderError};
    use async_trait::async_trait;

    struct CannedProvider {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl ChatProvider for CannedProvider {
        async fn complete(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Ok(self.reply.to_string())
        }

        fn name(&self) -> &str {
            self.name
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        async fn complete(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Err(ProviderError::HttpError("unreachable".to_string()))
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct ScriptedAnalyst;

    #[async_trait]
    impl ChatProvider for ScriptedAnalyst {
        async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
            let system = request.system.unwrap_or_default();
            if system.contains("adversarial") {
                Ok("Risk Score: 4/10".to_string())
            } else if system.contains("reliability") && !system.contains("synthesis") {
                Ok("Trust Score: 8/10".to_string())
            } else {
                Ok("Confidence Score: 7/10".to_string())
            }
        }

        fn name(&self) -> &str {
            "Analyst"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn pipeline(providers: Vec<Arc<dyn ChatProvider>>) -> QueryPipeline {
        QueryPipeline::new(
            providers,
            Arc::new(ScriptedAnalyst),
            &RuntimeConfig::default(),
            reqwest::Client::new(),
        )
    }

    fn offline_options() -> QueryOptions {
        QueryOptions {
            web_search: false,
            truth_verification: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_dispatch() {
        let pipeline = pipeline(vec![]);
        assert!(matches!(
            pipeline.run("   ", &QueryOptions::default()).await,
            Err(PipelineError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn test_complete_outcome_shape() {
        let providers: Vec<Arc<dyn ChatProvider>> = vec![
            Arc::new(CannedProvider { name: "A", reply: "Answer A" }),
            Arc::new(CannedProvider { name: "B", reply: "Answer B" }),
            Arc::new(FailingProvider),
        ];
        let pipeline = pipeline(providers);
        let outcome = pipeline.run("test", &offline_options()).await.unwrap();

        assert_eq!(outcome.responses.len(), 3);
        assert!(!outcome.web_search_used);
        assert!(outcome.verification.is_none());

        let score = outcome.h_score.as_ref().unwrap();
        // safety 7.0, trust 8.0, confidence 7.0, quality 2/3 * 10.
        assert_eq!(score.safety, 7.0);
        assert_eq!(score.trust, 8.0);
        assert_eq!(score.confidence, 7.0);
        assert_eq!(score.quality, 6.7);

        let reviews = outcome.reviews.as_ref().unwrap();
        assert!(reviews.synthesis.is_some());
    }

    #[tokio::test]
    async fn test_disabled_defensive_blocks_synthesis() {
        let providers: Vec<Arc<dyn ChatProvider>> =
            vec![Arc::new(CannedProvider { name: "A", reply: "ok" })];
        let pipeline = pipeline(providers);
        let options = QueryOptions {
            defensive_review: false,
            ..offline_options()
        };
        let outcome = pipeline.run("test", &options).await.unwrap();

        let reviews = outcome.reviews.as_ref().unwrap();
        assert!(reviews.adversarial.is_some());
        assert!(reviews.defensive.is_none());
        assert!(reviews.synthesis.is_none());
        // Missing defensive text extracts to the neutral default.
        assert_eq!(outcome.h_score.as_ref().unwrap().trust, 5.0);
    }

    #[tokio::test]
    async fn test_all_reviews_disabled_yields_no_review_set() {
        let providers: Vec<Arc<dyn ChatProvider>> =
            vec![Arc::new(CannedProvider { name: "A", reply: "ok" })];
        let pipeline = pipeline(providers);
        let options = QueryOptions {
            adversarial_review: false,
            defensive_review: false,
            synthesis_review: false,
            ..offline_options()
        };
        let outcome = pipeline.run("test", &options).await.unwrap();

        assert!(outcome.reviews.is_none());
        // H-Score still present, built entirely from defaults.
        let score = outcome.h_score.as_ref().unwrap();
        assert_eq!(score.safety, 6.0);
        assert_eq!(score.trust, 5.0);
        assert_eq!(score.quality, 10.0);
    }

    #[tokio::test]
    async fn test_verification_runs_when_enabled() {
        let providers: Vec<Arc<dyn ChatProvider>> = vec![Arc::new(CannedProvider {
            name: "A",
            reply: "The answer involves no links or dates.",
        })];
        let pipeline = pipeline(providers);
        let options = QueryOptions {
            truth_verification: true,
            ..offline_options()
        };
        let outcome = pipeline.run("test", &options).await.unwrap();

        let report = outcome.verification.as_ref().unwrap();
        assert_eq!(report.source_stats.urls_found, 0);
        assert!(report.overall_score >= 0.0 && report.overall_score <= 1.0);
    }

    #[tokio::test]
    async fn test_file_context_reaches_providers() {
        struct EchoPrompt;

        #[async_trait]
        impl ChatProvider for EchoPrompt {
            async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
                Ok(request.prompt)
            }

            fn name(&self) -> &str {
                "Echo"
            }

            fn is_configured(&self) -> bool {
                true
            }
        }

        let pipeline = pipeline(vec![Arc::new(EchoPrompt)]);
        let options = QueryOptions {
            file_context: Some("attached report text".to_string()),
            ..offline_options()
        };
        let outcome = pipeline.run("summarize", &options).await.unwrap();
        assert_eq!(
            outcome.responses[0].text,
            "attached report text\n\nUSER QUERY: summarize"
        );
    }

    #[tokio::test]
    async fn test_outcome_serializes_with_wire_names() {
        let pipeline = pipeline(vec![Arc::new(CannedProvider { name: "A", reply: "hi" })]);
        let outcome = pipeline.run("test", &offline_options()).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();

        assert!(json["responses"][0].get("model").is_some());
        assert!(json["responses"][0].get("response").is_some());
        assert!(json["team_analysis"].is_object());
        assert!(json["h_score"]["final"].is_number());
    }
}
