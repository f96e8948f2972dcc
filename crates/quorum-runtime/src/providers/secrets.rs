//! Secure credential handling for provider adapters.
//!
//! Centralized, type-safe handling of API keys:
//!
//! - **No accidental logging**: credentials never appear in Debug output
//! - **Memory safety**: credentials are zeroed on drop
//! - **Source tracking**: where a credential came from, for debugging
//!   configuration issues without exposing the value
//!
//! ## Usage
//!
//! ```ignore
//! let cred = ApiCredential::from_env("OPENAI_API_KEY");
//!
//! // Safe to log - shows [REDACTED]
//! tracing::debug!(?cred, "loaded credential");
//!
//! // Explicit exposure at the HTTP call site only
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically (tests, embedding callers)
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    /// Wrap a credential value.
    ///
    /// The value cannot be accidentally logged after this point.
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
        }
    }

    /// Load from an environment variable, `None` when unset.
    ///
    /// Absence is an expected configuration state, not an error: the
    /// owning adapter reports itself unconfigured and returns in-band
    /// diagnostics instead of making network calls.
    pub fn from_env(env_var: &str) -> Option<Self> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| Self::new(v, CredentialSource::Environment))
    }

    /// Expose the credential value. Call only at the point of use.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the stored value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Where this credential was loaded from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}
