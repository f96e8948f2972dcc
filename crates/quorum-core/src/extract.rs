//! Numeric rating extraction from free-text analysis output.
//!
//! Review passes are instructed to embed a rating line such as
//! `Risk Score: 7/10`. That textual convention is the sole interface
//! between free-text analysis and numeric scoring, so the pattern list
//! and the keyword fallback table live here as data — not inline logic —
//! where tests can pin them down.

use regex::Regex;

/// Neutral midpoint returned when no rating can be extracted.
pub const DEFAULT_SCORE: f64 = 5.0;

/// Lowest extractable rating.
pub const MIN_SCORE: f64 = 1.0;

/// Highest extractable rating.
pub const MAX_SCORE: f64 = 10.0;

/// Keyword fallbacks, checked in this order against lowercased text.
///
/// Order matters: "high" precedes "very high", so text containing
/// "very high" resolves to 8.0 via the plain "high" entry first.
pub const SCORE_KEYWORDS: &[(&str, f64)] = &[
    ("low", 3.0),
    ("minimal", 2.0),
    ("high", 8.0),
    ("very high", 9.0),
    ("excellent", 9.0),
    ("good", 7.0),
    ("moderate", 5.0),
    ("poor", 3.0),
];

/// The ordered rating-line patterns for a label, most specific first.
///
/// Labeled `/10` form, labeled bare form, then the generic `Score:`
/// forms. All case-insensitive; the first capture group is the rating.
pub fn score_patterns(label: &str) -> [String; 4] {
    let label = regex::escape(label);
    [
        format!(r"(?i){label}:\s*(\d+(?:\.\d+)?)/10"),
        format!(r"(?i){label}:\s*(\d+(?:\.\d+)?)"),
        r"(?i)Score:\s*(\d+(?:\.\d+)?)/10".to_string(),
        r"(?i)Score:\s*(\d+(?:\.\d+)?)".to_string(),
    ]
}

/// Extract a rating in `[1.0, 10.0]` from analysis text.
///
/// Tries each pattern of [`score_patterns`] in order; the first match
/// wins and its capture is parsed as a float. With no numeric match the
/// keyword table is scanned, and with no keyword hit the neutral
/// [`DEFAULT_SCORE`] is returned. Total: every input maps to a value in
/// range, including the empty string.
pub fn extract_score(text: &str, label: &str) -> f64 {
    if text.is_empty() {
        return DEFAULT_SCORE;
    }

    for pattern in score_patterns(label) {
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(text) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                return value.clamp(MIN_SCORE, MAX_SCORE);
            }
        }
    }

    let lowered = text.to_lowercase();
    for (keyword, score) in SCORE_KEYWORDS {
        if lowered.contains(keyword) {
            return *score;
        }
    }

    tracing::debug!(label, "no rating found in analysis text, using default");
    DEFAULT_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_labeled_slash_ten_form() {
        let text = "Risk Score: 7/10\n\nThe responses contain several unverifiable claims.";
        assert_eq!(extract_score(text, "Risk Score"), 7.0);
    }

    #[test]
    fn test_labeled_bare_form() {
        assert_eq!(extract_score("Trust Score: 8.5 overall", "Trust Score"), 8.5);
    }

    #[test]
    fn test_generic_score_fallback() {
        // No "Confidence Score:" line, but a generic "Score:" is present.
        assert_eq!(extract_score("Overall Score: 6/10", "Confidence Score"), 6.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_score("risk score: 9/10", "Risk Score"), 9.0);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Risk Score: 3/10 ... later revised to Risk Score: 9/10";
        assert_eq!(extract_score(text, "Risk Score"), 3.0);
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(extract_score("Risk Score: 15/10", "Risk Score"), 10.0);
        assert_eq!(extract_score("Risk Score: 0", "Risk Score"), 1.0);
    }

    #[test]
    fn test_keyword_fallback() {
        assert_eq!(extract_score("The reliability here is excellent.", "Trust Score"), 9.0);
        assert_eq!(extract_score("A poor set of answers.", "Trust Score"), 3.0);
    }

    #[test]
    fn test_keyword_priority_order() {
        // "low" is checked before "very high" or "excellent".
        assert_eq!(extract_score("low risk, excellent sourcing", "Risk Score"), 3.0);
        // "very high" never wins: "high" matches first.
        assert_eq!(extract_score("very high confidence", "Risk Score"), 8.0);
    }

    #[test]
    fn test_empty_and_unmatched_default() {
        assert_eq!(extract_score("", "Risk Score"), DEFAULT_SCORE);
        assert_eq!(extract_score("no rating anywhere", "Risk Score"), DEFAULT_SCORE);
    }

    #[test]
    fn test_label_with_regex_metacharacters() {
        // Labels are escaped before being compiled into a pattern.
        assert_eq!(extract_score("A+ (beta) Score: 4/10", "A+ (beta) Score"), 4.0);
    }

    proptest! {
        #[test]
        fn prop_total_and_in_range(text in ".*", label in "[A-Za-z ]{1,20}") {
            let score = extract_score(&text, &label);
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        }

        #[test]
        fn prop_idempotent(text in ".*") {
            let first = extract_score(&text, "Risk Score");
            let second = extract_score(&text, "Risk Score");
            prop_assert_eq!(first, second);
        }
    }
}
