//! Truth verification engine.
//!
//! Heuristic cross-checking of the primary responses against external
//! signals: a reliable-domain search for the query, a recency scan of
//! mentioned years, and liveness checks on any linked sources. Runs
//! independently of the review passes over the same result set, and
//! never fails the whole verification: each stage degrades to its
//! documented default and appends a warning.

use std::time::Duration;

use chrono::Datelike;
use futures::future::join_all;

use quorum_core::claims::MAX_URLS_PER_RESPONSE;
use quorum_core::verification::{
    CROSS_REF_NO_RESULTS, CROSS_REF_UNAVAILABLE,
};
use quorum_core::{
    bucket_confidence, cross_reference_score, extract_claims, extract_urls, find_years,
    is_reliable_host, normalize_url, overall_truth_score, source_score, temporal_score,
    verification_summary, ProviderResult, SourceRecord, SourceStats, VerificationReport,
};

use crate::config::RuntimeConfig;
use crate::providers::secrets::ApiCredential;
use crate::search::GoogleSearchResponse;

const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Restrict the cross-reference search to reliable top-level domains.
const RELIABLE_SITE_SEARCH: &str = "edu OR gov OR org";

/// Heuristic accuracy estimator over one query's response set.
pub struct TruthVerificationEngine {
    client: reqwest::Client,
    google: Option<ApiCredential>,
    engine_id: Option<String>,
    search_timeout: Duration,
    link_timeout: Duration,
}

impl TruthVerificationEngine {
    pub fn from_config(config: &RuntimeConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            google: ApiCredential::from_env("GOOGLE_API_KEY"),
            engine_id: config.search.resolve_engine_id(),
            search_timeout: config.timeouts.search(),
            link_timeout: config.timeouts.link_check(),
        }
    }

    /// Produce an accuracy estimate for one query's responses.
    pub async fn verify(&self, query: &str, results: &[ProviderResult]) -> VerificationReport {
        let mut warnings = Vec::new();

        let claims = extract_claims(results);

        // Cross-reference and source checks are both network-bound and
        // independent; the temporal scan is a pure pass over the text.
        let (cross_outcome, source_stats) =
            tokio::join!(self.cross_reference(query), self.verify_sources(results));

        let cross_reference = match cross_outcome {
            Ok(score) => score,
            Err(e) => {
                warnings.push(format!("Cross-reference failed: {e}"));
                CROSS_REF_UNAVAILABLE
            }
        };

        let years: Vec<i32> = results.iter().flat_map(|r| find_years(&r.text)).collect();
        let current_year = chrono::Utc::now().year();
        let temporal = temporal_score(&years, current_year);

        let source = source_score(&source_stats);
        let overall = overall_truth_score(cross_reference, temporal, source);
        let summary = verification_summary(overall, &source_stats);

        tracing::debug!(
            overall,
            cross_reference,
            temporal,
            source,
            claims = claims.len(),
            "verification complete"
        );

        VerificationReport {
            overall_score: overall,
            cross_reference_score: cross_reference,
            temporal_score: temporal,
            source_stats,
            confidence_level: bucket_confidence(overall),
            summary,
            claims,
            warnings,
        }
    }

    /// Search reliable domains for the query and score the result count.
    ///
    /// Unconfigured search is an expected state and scores the neutral
    /// default without a warning; transport and API failures are
    /// errors, reported to the caller for the warnings list.
    async fn cross_reference(&self, query: &str) -> Result<f64, reqwest::Error> {
        let (Some(google), Some(engine_id)) = (&self.google, &self.engine_id) else {
            return Ok(CROSS_REF_UNAVAILABLE);
        };

        let response = self
            .client
            .get(GOOGLE_SEARCH_ENDPOINT)
            .query(&[
                ("key", google.expose()),
                ("cx", engine_id.as_str()),
                ("q", query),
                ("num", "5"),
                ("siteSearch", RELIABLE_SITE_SEARCH),
                ("siteSearchFilter", "i"),
            ])
            .timeout(self.search_timeout)
            .send()
            .await?
            .error_for_status()?;

        let data: GoogleSearchResponse = response.json().await?;
        if data.items.is_empty() {
            return Ok(CROSS_REF_NO_RESULTS);
        }

        Ok(cross_reference_score(data.items.len()))
    }

    /// Check every linked source across all responses.
    async fn verify_sources(&self, results: &[ProviderResult]) -> SourceStats {
        let urls: Vec<String> = results
            .iter()
            .flat_map(|r| {
                extract_urls(&r.text)
                    .into_iter()
                    .take(MAX_URLS_PER_RESPONSE)
            })
            .map(|url| normalize_url(&url))
            .collect();

        let records = join_all(urls.iter().map(|url| self.check_url(url))).await;

        let mut stats = SourceStats::default();
        for record in records {
            stats.record(record);
        }
        stats
    }

    /// Lightweight existence check: HEAD only, no body fetch.
    async fn check_url(&self, url: &str) -> SourceRecord {
        let verified = match self
            .client
            .head(url)
            .timeout(self.link_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().as_u16() < 400,
            Err(e) => {
                tracing::debug!(url, error = %e, "link check failed");
                false
            }
        };

        let reliable = verified
            && reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(is_reliable_host))
                .unwrap_or(false);

        SourceRecord {
            url: url.to_string(),
            verified,
            reliable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::verification::{ConfidenceLevel, SOURCE_DEFAULT};

    /// Engine with no search credentials and no live link targets.
    fn offline_engine() -> TruthVerificationEngine {
        TruthVerificationEngine {
            client: reqwest::Client::new(),
            google: None,
            engine_id: None,
            search_timeout: Duration::from_secs(1),
            link_timeout: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn test_no_urls_source_defaults() {
        let engine = offline_engine();
        let results = vec![ProviderResult::answer("OpenAI", "No links in this answer at all.")];
        let report = engine.verify("test query", &results).await;

        assert_eq!(report.source_stats.urls_found, 0);
        // Without URLs the source sub-score is the fixed default; with
        // unconfigured search the cross-reference is neutral.
        assert_eq!(report.cross_reference_score, CROSS_REF_UNAVAILABLE);
        // overall = 0.4*0.5 + 0.3*temporal + 0.2*0.7 + 0.07
        let expected = overall_truth_score(CROSS_REF_UNAVAILABLE, report.temporal_score, SOURCE_DEFAULT);
        assert_eq!(report.overall_score, expected);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_stale_years_score_low() {
        let engine = offline_engine();
        let results = vec![ProviderResult::answer(
            "Claude",
            "The framework was standardized in 2019 and has not changed since",
        )];
        let report = engine.verify("standardization history", &results).await;
        // 2019 is more than five years behind any current clock >= 2025.
        assert_eq!(report.temporal_score, 0.4);
    }

    #[tokio::test]
    async fn test_no_years_temporal_default() {
        let engine = offline_engine();
        let results = vec![ProviderResult::answer("Gemini", "Water boils at one hundred degrees.")];
        let report = engine.verify("boiling point", &results).await;
        assert_eq!(report.temporal_score, 0.7);
    }

    #[tokio::test]
    async fn test_claims_surface_in_report() {
        let engine = offline_engine();
        let results = vec![ProviderResult::answer(
            "OpenAI",
            "According to the agency, output grew 4 percent over the decade measured",
        )];
        let report = engine.verify("growth", &results).await;
        assert_eq!(report.claims.len(), 1);
        assert_eq!(report.claims[0].provider, "OpenAI");
    }

    #[tokio::test]
    async fn test_empty_results_still_produce_report() {
        let engine = offline_engine();
        let report = engine.verify("anything", &[]).await;
        assert!(report.overall_score >= 0.0 && report.overall_score <= 1.0);
        assert!(matches!(
            report.confidence_level,
            ConfidenceLevel::High
                | ConfidenceLevel::Medium
                | ConfidenceLevel::Low
                | ConfidenceLevel::VeryLow
        ));
        assert!(!report.summary.is_empty());
    }
}
