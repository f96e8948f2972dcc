//! Verification report types and sub-score composition.
//!
//! The truth verification engine in the runtime crate gathers raw
//! signals (search hits, link checks, year mentions); everything that
//! turns those signals into scores, buckets, and summaries is
//! deterministic and lives here.

use serde::{Deserialize, Serialize};

use crate::claims::Claim;

/// Cross-reference score when the search succeeds but finds nothing.
pub const CROSS_REF_NO_RESULTS: f64 = 0.3;

/// Cross-reference score when the search API is unavailable or errors.
pub const CROSS_REF_UNAVAILABLE: f64 = 0.5;

/// Search results needed for a full cross-reference score.
pub const CROSS_REF_TARGET: usize = 5;

/// Temporal score when no years are mentioned at all.
pub const TEMPORAL_DEFAULT: f64 = 0.7;

/// Source score when no URLs were found in any response.
pub const SOURCE_DEFAULT: f64 = 0.7;

/// Fixed consistency placeholder folded into the composite.
pub const CONSISTENCY_PLACEHOLDER: f64 = 0.7;

/// Composite weights: cross-reference, temporal, source, consistency.
pub const TRUTH_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

/// Outcome of one URL existence check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// The checked URL (scheme-normalized).
    pub url: String,

    /// Whether the existence check returned a non-error status.
    pub verified: bool,

    /// Whether the host is on the reliable-domain allow-list.
    pub reliable: bool,
}

/// Accumulated source-verification counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub urls_found: u32,
    pub urls_verified: u32,
    pub reliable_sources: u32,
    pub broken_links: u32,
    pub details: Vec<SourceRecord>,
}

impl SourceStats {
    /// Record one check outcome and update the counts.
    pub fn record(&mut self, record: SourceRecord) {
        self.urls_found += 1;
        if record.verified {
            self.urls_verified += 1;
            if record.reliable {
                self.reliable_sources += 1;
            }
        } else {
            self.broken_links += 1;
        }
        self.details.push(record);
    }
}

/// Confidence bucket derived from the overall truth score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

/// Independent accuracy estimate for one query's response set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Weighted composite in `[0, 1]`, rounded to two decimals.
    pub overall_score: f64,

    pub cross_reference_score: f64,
    pub temporal_score: f64,
    pub source_stats: SourceStats,
    pub confidence_level: ConfidenceLevel,
    pub summary: String,

    /// Factual-looking sentences found in the responses.
    pub claims: Vec<Claim>,

    /// Stage failures, in the order they occurred.
    pub warnings: Vec<String>,
}

/// Temporal accuracy from the set of years mentioned across responses.
///
/// 0.9 if any year is within 2 of the current year, 0.7 if any is
/// within 5, 0.4 otherwise; [`TEMPORAL_DEFAULT`] when nothing was
/// mentioned.
pub fn temporal_score(years: &[i32], current_year: i32) -> f64 {
    if years.is_empty() {
        return TEMPORAL_DEFAULT;
    }
    if years.iter().any(|y| *y >= current_year - 2) {
        0.9
    } else if years.iter().any(|y| *y >= current_year - 5) {
        0.7
    } else {
        0.4
    }
}

/// Cross-reference score from a successful reliable-domain search.
pub fn cross_reference_score(result_count: usize) -> f64 {
    if result_count == 0 {
        CROSS_REF_NO_RESULTS
    } else {
        (result_count as f64 / CROSS_REF_TARGET as f64).min(1.0)
    }
}

/// Source sub-score: verified and reliable ratios when any URL was
/// found, [`SOURCE_DEFAULT`] otherwise.
pub fn source_score(stats: &SourceStats) -> f64 {
    if stats.urls_found == 0 {
        return SOURCE_DEFAULT;
    }
    let found = stats.urls_found as f64;
    let verified_ratio = stats.urls_verified as f64 / found;
    let reliable_ratio = stats.reliable_sources as f64 / found;
    0.6 * verified_ratio + 0.4 * reliable_ratio
}

/// Weighted composite of the sub-scores, rounded to two decimals.
pub fn overall_truth_score(cross_reference: f64, temporal: f64, source: f64) -> f64 {
    let [w_cross, w_temporal, w_source, w_consistency] = TRUTH_WEIGHTS;
    let score = cross_reference * w_cross
        + temporal * w_temporal
        + source * w_source
        + CONSISTENCY_PLACEHOLDER * w_consistency;
    (score * 100.0).round() / 100.0
}

/// Bucket an overall score into a confidence level.
pub fn bucket_confidence(score: f64) -> ConfidenceLevel {
    if score >= 0.8 {
        ConfidenceLevel::High
    } else if score >= 0.6 {
        ConfidenceLevel::Medium
    } else if score >= 0.4 {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::VeryLow
    }
}

/// Human-readable summary for the report.
pub fn verification_summary(score: f64, stats: &SourceStats) -> String {
    let mut summary = if score >= 0.8 {
        "High Accuracy: Information appears to be well-supported by reliable sources.".to_string()
    } else if score >= 0.6 {
        "Moderate Accuracy: Some information verified, but exercise caution.".to_string()
    } else if score >= 0.4 {
        "Low Accuracy: Limited verification found. Independent research recommended.".to_string()
    } else {
        "Questionable Accuracy: Significant concerns about information reliability.".to_string()
    };

    if stats.reliable_sources > 0 {
        summary.push_str(&format!(" ({} reliable sources found)", stats.reliable_sources));
    }

    summary
}
