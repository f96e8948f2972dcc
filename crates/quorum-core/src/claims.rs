//! Shared heuristic patterns for truth verification.
//!
//! Claim extraction, year scanning, URL extraction, and the
//! reliable-domain allow-list. These are plain pattern scans over
//! response text; no network access happens in this module.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::response::ProviderResult;

/// Upper bound on extracted claims per verification run.
pub const MAX_CLAIMS: usize = 10;

/// Minimum sentence length considered for claim extraction.
pub const MIN_CLAIM_LEN: usize = 20;

/// URLs checked per response during source verification.
pub const MAX_URLS_PER_RESPONSE: usize = 3;

/// Domains and outlets treated as reliable sources.
///
/// Matched by substring against the URL host, so `.edu` covers any
/// educational host.
pub const RELIABLE_DOMAINS: &[&str] = &[
    ".edu",
    ".gov",
    ".org",
    "reuters.com",
    "bbc.com",
    "nature.com",
    "science.org",
    "nih.gov",
    "who.int",
];

lazy_static! {
    // =========================================================================
    // FACTUAL CLAIM PATTERNS
    // =========================================================================

    /// Sentence-level indicators that a factual claim is being made.
    pub static ref FACT_PATTERNS: Vec<Regex> = vec![
        // Years
        Regex::new(r"\d{4}").unwrap(),
        // Percentages
        Regex::new(r"\d+(?:\.\d+)?%").unwrap(),
        // Money amounts
        Regex::new(r"\$\d+(?:\.\d+)?(?:\s?(?:million|billion|trillion))?").unwrap(),
        // Unit measurements
        Regex::new(r"\d+(?:\.\d+)?\s?(?:km|miles|meters|feet|kg|pounds|tons)").unwrap(),
        // Temporal references
        Regex::new(r"(?i)(?:in|on|during)\s+\d{4}").unwrap(),
        // Source attributions
        Regex::new(r"(?i)according to [^,.]+").unwrap(),
        // Research claims
        Regex::new(r"(?i)studies show|research indicates|data suggests").unwrap(),
    ];

    /// Sentence terminators used to split response text.
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();

    /// Four-digit years in the 2000s.
    static ref YEAR_PATTERN: Regex = Regex::new(r"\b(20\d{2})\b").unwrap();

    /// URL-like substrings: explicit scheme, www-prefixed, or bare domain.
    static ref URL_PATTERN: Regex = Regex::new(
        r#"https?://[^\s<>"']+|www\.[^\s<>"']+|\b[a-zA-Z0-9][a-zA-Z0-9-]*\.[a-zA-Z]{2,}\b"#
    )
    .unwrap();
}

/// A sentence that looks like a factual claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim sentence, trimmed.
    pub text: String,

    /// Provider whose response contained the claim.
    pub provider: String,
}

/// Extract factual-looking sentences from error-free responses.
///
/// Responses are split on sentence terminators; sentences longer than
/// [`MIN_CLAIM_LEN`] that match any [`FACT_PATTERNS`] entry are kept,
/// capped at [`MAX_CLAIMS`] overall.
pub fn extract_claims(results: &[ProviderResult]) -> Vec<Claim> {
    let mut claims = Vec::new();

    for result in results.iter().filter(|r| !r.is_error) {
        for sentence in SENTENCE_SPLIT.split(&result.text) {
            let sentence = sentence.trim();
            if sentence.len() <= MIN_CLAIM_LEN {
                continue;
            }
            if FACT_PATTERNS.iter().any(|p| p.is_match(sentence)) {
                claims.push(Claim {
                    text: sentence.to_string(),
                    provider: result.provider.clone(),
                });
                if claims.len() >= MAX_CLAIMS {
                    return claims;
                }
            }
        }
    }

    claims
}

/// All four-digit years (2000-2099) mentioned in the text.
pub fn find_years(text: &str) -> Vec<i32> {
    YEAR_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// URL-like substrings in the text, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Prefix bare URLs with a scheme so they can be requested.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Whether a URL host belongs to the reliable-domain allow-list.
pub fn is_reliable_host(host: &str) -> bool {
    let host = host.to_lowercase();
    RELIABLE_DOMAINS.iter().any(|domain| host.contains(domain))
}
