//! # quorum-runtime
//!
//! The parallel multi-provider query, review, and verification
//! pipeline for Quorum.
//!
//! One query fans out concurrently to every enabled provider adapter;
//! every outcome — answer or in-band failure — is collected without
//! letting a slow provider block the batch. The collected result set
//! then feeds two independent consumers:
//!
//! - the review pass engine (adversarial and defensive reviews in
//!   parallel, then a gated synthesis), whose free-text findings the
//!   deterministic scorer in `quorum-core` folds into the composite
//!   H-Score, and
//! - the truth verification engine, which cross-checks the responses
//!   against external signals (reliable-domain search, year recency,
//!   link liveness).
//!
//! Failures degrade, never propagate: adapters convert every error
//! into a diagnostic result record, and each verification stage falls
//! back to its documented default.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quorum_runtime::{QueryOptions, QueryPipeline, RuntimeConfig};
//!
//! let config = RuntimeConfig::default();
//! let pipeline = QueryPipeline::from_config(&config);
//! let outcome = pipeline.run("What changed this year?", &QueryOptions::default()).await?;
//! println!("H-Score: {:?}", outcome.h_score);
//! ```

pub mod config;
pub mod dispatch;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod review;
pub mod search;
pub mod verify;

// Re-export main types at crate root
pub use config::{AnalystConfig, ConfigError, ProviderToggles, RuntimeConfig, SearchConfig, TimeoutConfig};
pub use dispatch::{dispatch_all, run_provider};
pub use pipeline::{PipelineError, QueryOptions, QueryOutcome, QueryPipeline};
pub use providers::{
    ApiCredential, ChatProvider, ChatRequest, CompletionConfig, CredentialSource, ProviderError,
};
pub use review::{ReviewEngine, ReviewToggles};
pub use search::SearchClient;
pub use verify::TruthVerificationEngine;
