//! Composite H-Score calculation.
//!
//! The H-Score folds the three review ratings and the response-success
//! ratio into one fixed-weight composite. Deterministic fan-in: same
//! results and review texts always produce the same score.

use serde::{Deserialize, Serialize};

use crate::extract::{extract_score, DEFAULT_SCORE};
use crate::response::ProviderResult;

/// Weight applied to each of the four components.
const COMPONENT_WEIGHT: f64 = 0.25;

/// The composite trust assessment for one query.
///
/// `final_score` is the weighted combination of the other four fields;
/// each weighted input is clamped to its range upstream, so the final
/// value always lands in `[1.0, 10.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HScore {
    /// Weighted composite, rounded to two decimals.
    #[serde(rename = "final")]
    pub final_score: f64,

    /// Inverted adversarial risk rating (`11 - risk`).
    pub safety: f64,

    /// Defensive trust rating.
    pub trust: f64,

    /// Synthesis confidence rating.
    pub confidence: f64,

    /// Response-success ratio scaled to `[0, 10]`.
    pub quality: f64,
}

/// Compute the H-Score from primary results and review texts.
///
/// Pass `""` for any review that did not run; extraction resolves the
/// empty string to the neutral default rating.
pub fn compute_h_score(
    results: &[ProviderResult],
    adversarial: &str,
    defensive: &str,
    synthesis: &str,
) -> HScore {
    let risk = extract_score(adversarial, "Risk Score");
    let trust = extract_score(defensive, "Trust Score");
    let confidence = extract_score(synthesis, "Confidence Score");

    let safety = 11.0 - risk;
    let quality = response_quality(results);

    let final_score =
        COMPONENT_WEIGHT * safety + COMPONENT_WEIGHT * trust + COMPONENT_WEIGHT * confidence
            + COMPONENT_WEIGHT * quality;

    HScore {
        final_score: round_to(final_score, 2),
        safety: round_to(safety, 1),
        trust: round_to(trust, 1),
        confidence: round_to(confidence, 1),
        quality: round_to(quality, 1),
    }
}

/// Success ratio scaled to `[0, 10]`, defaulting to the neutral
/// midpoint when there are no results at all.
fn response_quality(results: &[ProviderResult]) -> f64 {
    if results.is_empty() {
        return DEFAULT_SCORE;
    }
    let successful = results.iter().filter(|r| r.counts_as_successful()).count();
    (successful as f64 / results.len() as f64) * 10.0
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn answer(text: &str) -> ProviderResult {
        ProviderResult::answer("Test", text)
    }

    fn failure(text: &str) -> ProviderResult {
        ProviderResult::error("Test", text)
    }

    #[test]
    fn test_risk_seven_inverts_to_safety_four() {
        let results = vec![answer("Risk Score: 7/10")];
        let score = compute_h_score(&results, "Risk Score: 7/10", "", "");
        assert_eq!(score.safety, 4.0);
    }

    #[test]
    fn test_all_responses_successful_quality_ten() {
        let results = vec![answer("a"), answer("b"), answer("c")];
        let score = compute_h_score(&results, "", "", "");
        assert_eq!(score.quality, 10.0);
    }

    #[test]
    fn test_zero_successful_quality_zero() {
        let results = vec![
            failure("[OpenAI error: HTTP 500]"),
            failure("[Claude error: timeout]"),
            failure("[Gemini error: bad payload]"),
        ];
        let score = compute_h_score(&results, "", "", "");
        assert_eq!(score.quality, 0.0);
    }

    #[test]
    fn test_no_results_quality_neutral() {
        let score = compute_h_score(&[], "", "", "");
        assert_eq!(score.quality, 5.0);
    }

    #[test]
    fn test_known_loose_quality_boundary() {
        // Known-loose boundary: a response is excluded only when it both
        // starts with "[" AND mentions "error". A bracketed unavailable
        // marker, or an unbracketed sentence containing "error", both
        // still count as successful.
        let results = vec![
            failure("[Cohere unavailable: COHERE_API_KEY not set]"),
            answer("The standard error of the mean shrinks with n."),
        ];
        let score = compute_h_score(&results, "", "", "");
        assert_eq!(score.quality, 10.0);
    }

    #[test]
    fn test_missing_reviews_fall_back_to_neutral() {
        let results = vec![answer("fine")];
        let score = compute_h_score(&results, "", "", "");
        // risk 5 -> safety 6; trust 5; confidence 5; quality 10.
        assert_eq!(score.safety, 6.0);
        assert_eq!(score.trust, 5.0);
        assert_eq!(score.confidence, 5.0);
        assert_eq!(score.final_score, 6.5);
    }

    #[test]
    fn test_wire_shape_uses_final() {
        let score = compute_h_score(&[answer("ok")], "", "", "");
        let json = serde_json::to_value(&score).unwrap();
        assert!(json.get("final").is_some());
        assert!(json.get("final_score").is_none());
    }

    #[test]
    fn test_rounding_precision() {
        let results = vec![answer("a"), answer("b"), failure("[X error: y]")];
        let score = compute_h_score(&results, "Risk Score: 3/10", "Trust Score: 7/10", "");
        // quality = 2/3 * 10 = 6.666... -> 6.7 at one decimal.
        assert_eq!(score.quality, 6.7);
        // final = 0.25 * (8 + 7 + 5 + 6.666...) = 6.6666... -> 6.67.
        assert_eq!(score.final_score, 6.67);
    }

    proptest! {
        #[test]
        fn prop_final_always_in_range(
            adversarial in ".*",
            defensive in ".*",
            synthesis in ".*",
            errors in proptest::collection::vec(any::<bool>(), 0..8),
        ) {
            let results: Vec<ProviderResult> = errors
                .iter()
                .map(|is_err| {
                    if *is_err {
                        failure("[Provider error: failed]")
                    } else {
                        answer("ok")
                    }
                })
                .collect();
            let score = compute_h_score(&results, &adversarial, &defensive, &synthesis);
            // safety in [1,10], trust/confidence in [1,10], quality in
            // [0,10]; the 0.25 weights keep the composite within [1,10].
            prop_assert!(score.final_score >= 1.0 && score.final_score <= 10.0);
        }
    }
}
