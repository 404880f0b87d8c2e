//! Error types for the authentication layer.
//!
//! Verification failures are not errors: they are reported as
//! [`verifier::VerificationOutcome`] values. These types cover requests that
//! never reach verification and conditions the caller must act on.

/// Errors surfaced to the caller of the login flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The subject key is not a registered identity.
    #[error("identity not found")]
    NotFound,

    /// A wire payload failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The secure random source failed. Callers must treat this as fatal.
    #[error("secure random source unavailable: {0}")]
    EntropyUnavailable(String),
}

impl AuthError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        AuthError::InvalidRequest(msg.into())
    }

    /// Whether the process should stop rather than continue serving.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AuthError::EntropyUnavailable(_))
    }
}

/// Errors raised while loading [`crate::AuthConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
