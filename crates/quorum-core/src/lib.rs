//! # quorum-core
//!
//! Deterministic scoring and verification heuristics for Quorum.
//!
//! This crate holds everything that can be computed without touching
//! the network: the query/result data model, numeric rating extraction
//! from free-text analysis, the composite H-Score, and the heuristic
//! building blocks of truth verification (claim patterns, year and URL
//! scanning, sub-score composition).
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same inputs always produce the same scores
//! 2. **Total**: extraction and scoring never fail; ambiguity resolves
//!    to documented defaults
//! 3. **No I/O**: provider calls, search, and link checks live in
//!    `quorum-runtime`
//!
//! ## Example
//!
//! ```rust,ignore
//! use quorum_core::{compute_h_score, extract_score, ProviderResult};
//!
//! let results = vec![ProviderResult::answer("Claude", "It is 42.")];
//! let risk = extract_score("Risk Score: 3/10 ...", "Risk Score");
//! let score = compute_h_score(&results, "Risk Score: 3/10", "", "");
//! assert!(score.final_score >= 1.0 && score.final_score <= 10.0);
//! ```

pub mod claims;
pub mod extract;
pub mod response;
pub mod score;
pub mod verification;

// Re-export main types at crate root
pub use claims::{extract_claims, extract_urls, find_years, is_reliable_host, normalize_url, Claim};
pub use extract::{extract_score, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
pub use response::{ProviderResult, Query, ReviewFinding, ReviewKind, ReviewSet};
pub use score::{compute_h_score, HScore};
pub use verification::{
    bucket_confidence, cross_reference_score, overall_truth_score, source_score, temporal_score,
    verification_summary, ConfidenceLevel, SourceRecord, SourceStats, VerificationReport,
};
