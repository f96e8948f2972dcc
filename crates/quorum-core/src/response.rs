//! Query and provider result types.
//!
//! A [`Query`] is the immutable input to one dispatch: the user's text
//! plus optional context (web search results, uploaded-file text) that
//! is prepended before transmission. A [`ProviderResult`] is the uniform
//! record every adapter produces, success or failure — failures are
//! carried in-band as bracketed diagnostic text, never as errors.

use serde::{Deserialize, Serialize};

/// Delimiter between prepended context and the user's query.
const CONTEXT_DELIMITER: &str = "\n\nUSER QUERY: ";

/// One query as dispatched to the provider fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    text: String,
    context: Option<String>,
}

impl Query {
    /// Create a query with no prepended context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    /// Attach context to prepend before the query text.
    ///
    /// Context is treated as opaque text; no size limit is imposed here.
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// The raw query text as supplied by the caller.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any context is attached.
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// The full prompt as transmitted to a provider.
    ///
    /// With context attached this is `<context>\n\nUSER QUERY: <text>`,
    /// otherwise the query text alone.
    pub fn full_prompt(&self) -> String {
        match &self.context {
            Some(context) => format!("{}{}{}", context, CONTEXT_DELIMITER, self.text),
            None => self.text.clone(),
        }
    }
}

/// The uniform outcome of one provider call.
///
/// Exactly one of these is produced per configured provider per query,
/// regardless of outcome. When `is_error` is set, `text` holds a
/// bracketed diagnostic (e.g. `[Claude error: connection refused]`)
/// rather than an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Display name of the provider ("OpenAI", "Claude", ...).
    #[serde(rename = "model")]
    pub provider: String,

    /// Answer text, or a bracketed diagnostic when `is_error`.
    #[serde(rename = "response")]
    pub text: String,

    /// True when the adapter could not obtain a usable answer.
    pub is_error: bool,
}

impl ProviderResult {
    /// A successful answer.
    pub fn answer(provider: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: text.into(),
            is_error: false,
        }
    }

    /// An in-band failure record carrying a bracketed diagnostic.
    pub fn error(provider: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: diagnostic.into(),
            is_error: true,
        }
    }

    /// Whether this result counts as successful for the quality metric.
    ///
    /// A result is excluded only if its text both starts with `[` and
    /// contains "error" (case-insensitive). A bracketed but error-free
    /// marker — e.g. a credential-absent diagnostic — still counts.
    /// This dual condition is a deliberately loose boundary inherited
    /// from the scoring heuristic; see the tests in `score.rs`.
    pub fn counts_as_successful(&self) -> bool {
        !(self.text.starts_with('[') && self.text.to_lowercase().contains("error"))
    }
}

/// A secondary analysis pass kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Adversarial risk review over the primary results.
    Adversarial,
    /// Defensive trust review over the primary results.
    Defensive,
    /// Synthesis of the adversarial and defensive findings.
    Synthesis,
}

impl ReviewKind {
    /// Human-readable label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewKind::Adversarial => "Adversarial",
            ReviewKind::Defensive => "Defensive",
            ReviewKind::Synthesis => "Synthesis",
        }
    }

    /// The rating line label this pass is instructed to emit.
    pub fn score_label(&self) -> &'static str {
        match self {
            ReviewKind::Adversarial => "Risk Score",
            ReviewKind::Defensive => "Trust Score",
            ReviewKind::Synthesis => "Confidence Score",
        }
    }
}

/// Free-form natural-language output from one review pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewFinding {
    /// Which pass produced this finding.
    pub kind: ReviewKind,

    /// The analysis text. On analyst failure this is a diagnostic
    /// string; downstream scoring falls back to defaults.
    pub text: String,
}

impl ReviewFinding {
    pub fn new(kind: ReviewKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The findings of one review run, `None` where a pass was disabled
/// or its dependency was not satisfied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSet {
    pub adversarial: Option<ReviewFinding>,
    pub defensive: Option<ReviewFinding>,
    pub synthesis: Option<ReviewFinding>,
}

impl ReviewSet {
    /// Text of a finding, or `""` when absent.
    ///
    /// The empty string feeds the score extractor, which resolves it
    /// to the neutral default.
    pub fn text_of(&self, kind: ReviewKind) -> &str {
        let finding = match kind {
            ReviewKind::Adversarial => &self.adversarial,
            ReviewKind::Defensive => &self.defensive,
            ReviewKind::Synthesis => &self.synthesis,
        };
        finding.as_ref().map(|f| f.text.as_str()).unwrap_or("")
    }
}
