//! Review pass engine.
//!
//! Three secondary analyses over the primary result set: adversarial
//! and defensive reviews run concurrently and independently, then a
//! synthesis review runs only once both of their findings exist. That
//! gate is a plain join on the two prerequisite futures — exactly one
//! dependency, no workflow machinery.

use std::sync::Arc;

use quorum_core::{ProviderResult, ReviewFinding, ReviewKind, ReviewSet};

use crate::prompts;
use crate::providers::{ChatProvider, ChatRequest};

/// Per-invocation review toggles.
#[derive(Debug, Clone, Copy)]
pub struct ReviewToggles {
    pub adversarial: bool,
    pub defensive: bool,
    pub synthesis: bool,
}

impl Default for ReviewToggles {
    fn default() -> Self {
        Self {
            adversarial: true,
            defensive: true,
            synthesis: true,
        }
    }
}

impl ReviewToggles {
    /// Whether any pass is enabled at all.
    pub fn any(&self) -> bool {
        self.adversarial || self.defensive || self.synthesis
    }
}

/// Runs the three review passes against a single analyst provider.
pub struct ReviewEngine {
    analyst: Arc<dyn ChatProvider>,
}

impl ReviewEngine {
    pub fn new(analyst: Arc<dyn ChatProvider>) -> Self {
        Self { analyst }
    }

    /// Run the enabled passes over one query's primary results.
    ///
    /// Never fails: an analyst error turns the affected finding's text
    /// into a diagnostic string, and downstream scoring falls back to
    /// its defaults. The synthesis slot stays `None` when either
    /// prerequisite finding is absent.
    pub async fn run(
        &self,
        query: &str,
        results: &[ProviderResult],
        toggles: &ReviewToggles,
    ) -> ReviewSet {
        let transcript = prompts::transcript(results);

        let (adversarial, defensive) = tokio::join!(
            self.maybe_pass(
                toggles.adversarial,
                ReviewKind::Adversarial,
                prompts::ADVERSARIAL_SYSTEM_PROMPT,
                prompts::adversarial_prompt(query, &transcript),
            ),
            self.maybe_pass(
                toggles.defensive,
                ReviewKind::Defensive,
                prompts::DEFENSIVE_SYSTEM_PROMPT,
                prompts::defensive_prompt(query, &transcript),
            ),
        );

        let synthesis = match (&adversarial, &defensive) {
            (Some(adv), Some(def)) if toggles.synthesis => Some(
                self.run_pass(
                    ReviewKind::Synthesis,
                    prompts::SYNTHESIS_SYSTEM_PROMPT,
                    prompts::synthesis_prompt(query, &adv.text, &def.text),
                )
                .await,
            ),
            _ => None,
        };

        ReviewSet {
            adversarial,
            defensive,
            synthesis,
        }
    }

    async fn maybe_pass(
        &self,
        enabled: bool,
        kind: ReviewKind,
        system: &str,
        prompt: String,
    ) -> Option<ReviewFinding> {
        if !enabled {
            return None;
        }
        Some(self.run_pass(kind, system, prompt).await)
    }

    async fn run_pass(&self, kind: ReviewKind, system: &str, prompt: String) -> ReviewFinding {
        if !self.analyst.is_configured() {
            return ReviewFinding::new(
                kind,
                format!(
                    "{} review unavailable (analyst credential required)",
                    kind.label()
                ),
            );
        }

        let request = ChatRequest::user(prompt).with_system(system);
        match self.analyst.complete(request).await {
            Ok(text) => ReviewFinding::new(kind, text.trim()),
            Err(e) => {
                tracing::warn!(kind = ?kind, error = %e, "review pass failed");
                ReviewFinding::new(kind, format!("{} review failed: {}", kind.label(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;

    /// Analyst that answers every pass with a canned rating line.
    struct ScriptedAnalyst;

    #[async_trait]
    impl ChatProvider for ScriptedAnalyst {
        async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
            let system = request.system.unwrap_or_default();
            if system.contains("adversarial") {
                Ok("Risk Score: 7/10\nSeveral unverifiable claims.".to_string())
            } else if system.contains("reliability") && !system.contains("synthesis") {
                Ok("Trust Score: 8/10\nLargely consistent responses.".to_string())
            } else {
                Ok("Confidence Score: 6/10\nBalanced outlook.".to_string())
            }
        }

        fn name(&self) -> &str {
            "Analyst"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct BrokenAnalyst;

    #[async_trait]
    impl ChatProvider for BrokenAnalyst {
        async fn complete(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Err(ProviderError::HttpError("boom".to_string()))
        }

        fn name(&self) -> &str {
            "Analyst"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    struct UnconfiguredAnalyst;

    #[async_trait]
    impl ChatProvider for UnconfiguredAnalyst {
        async fn complete(&self, _request: ChatRequest) -> Result<String, ProviderError> {
            Err(ProviderError::NotConfigured("OPENAI_API_KEY"))
        }

        fn name(&self) -> &str {
            "Analyst"
        }

        fn is_configured(&self) -> bool {
            false
        }
    }

    fn results() -> Vec<ProviderResult> {
        vec![ProviderResult::answer("OpenAI", "An answer.")]
    }

    #[tokio::test]
    async fn test_all_passes_run() {
        let engine = ReviewEngine::new(Arc::new(ScriptedAnalyst));
        let set = engine.run("q", &results(), &ReviewToggles::default()).await;
        assert!(set.adversarial.as_ref().unwrap().text.contains("Risk Score: 7/10"));
        assert!(set.defensive.as_ref().unwrap().text.contains("Trust Score: 8/10"));
        assert!(set.synthesis.as_ref().unwrap().text.contains("Confidence Score: 6/10"));
    }

    #[tokio::test]
    async fn test_synthesis_gated_on_defensive() {
        let engine = ReviewEngine::new(Arc::new(ScriptedAnalyst));
        let toggles = ReviewToggles {
            adversarial: true,
            defensive: false,
            synthesis: true,
        };
        let set = engine.run("q", &results(), &toggles).await;
        assert!(set.adversarial.is_some());
        assert!(set.defensive.is_none());
        assert!(set.synthesis.is_none());
    }

    #[tokio::test]
    async fn test_synthesis_gated_on_adversarial() {
        let engine = ReviewEngine::new(Arc::new(ScriptedAnalyst));
        let toggles = ReviewToggles {
            adversarial: false,
            defensive: true,
            synthesis: true,
        };
        let set = engine.run("q", &results(), &toggles).await;
        assert!(set.synthesis.is_none());
    }

    #[tokio::test]
    async fn test_synthesis_toggle_off() {
        let engine = ReviewEngine::new(Arc::new(ScriptedAnalyst));
        let toggles = ReviewToggles {
            adversarial: true,
            defensive: true,
            synthesis: false,
        };
        let set = engine.run("q", &results(), &toggles).await;
        assert!(set.adversarial.is_some());
        assert!(set.defensive.is_some());
        assert!(set.synthesis.is_none());
    }

    #[tokio::test]
    async fn test_analyst_failure_becomes_diagnostic_text() {
        let engine = ReviewEngine::new(Arc::new(BrokenAnalyst));
        let set = engine.run("q", &results(), &ReviewToggles::default()).await;
        let adversarial = set.adversarial.as_ref().unwrap();
        assert!(adversarial.text.starts_with("Adversarial review failed:"));
        // Findings exist even as diagnostics, so the synthesis gate
        // still opens (it synthesizes over the failure text).
        assert!(set.synthesis.is_some());
    }

    #[tokio::test]
    async fn test_unconfigured_analyst_reports_unavailable() {
        let engine = ReviewEngine::new(Arc::new(UnconfiguredAnalyst));
        let set = engine.run("q", &results(), &ReviewToggles::default()).await;
        assert_eq!(
            set.adversarial.as_ref().unwrap().text,
            "Adversarial review unavailable (analyst credential required)"
        );
    }

    #[tokio::test]
    async fn test_disabled_everything_yields_empty_set() {
        let engine = ReviewEngine::new(Arc::new(ScriptedAnalyst));
        let toggles = ReviewToggles {
            adversarial: false,
            defensive: false,
            synthesis: false,
        };
        let set = engine.run("q", &results(), &toggles).await;
        assert_eq!(set, ReviewSet::default());
        assert!(!toggles.any());
    }
}
