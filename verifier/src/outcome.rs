//! Verification results and the fixed failure taxonomy.

use core::fmt;

use serde::Serialize;

use crate::errors::SignatureError;

/// Why an authentication attempt failed.
///
/// The reason strings are stable and safe to log; they never include key,
/// nonce or proof material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Malformed key, malformed proof, or an out-of-range scalar/field value.
    DecodeError,
    /// No challenge outstanding for the subject key.
    NoActiveChallenge,
    /// The challenge outlived its TTL before it was consumed.
    ChallengeExpired,
    /// The client echoed a different challenge than the one issued.
    ChallengeMismatch,
    /// The proof decoded cleanly but the verification equation failed.
    SignatureInvalid,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::DecodeError => "decode error",
            FailureReason::NoActiveChallenge => "no active challenge",
            FailureReason::ChallengeExpired => "challenge expired",
            FailureReason::ChallengeMismatch => "challenge mismatch",
            FailureReason::SignatureInvalid => "signature mismatch",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single verification: a validity flag plus the failure reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "verification outcome must be checked"]
pub struct VerificationOutcome {
    valid: bool,
    reason: Option<FailureReason>,
}

impl VerificationOutcome {
    pub const fn success() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub const fn failure(reason: FailureReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `None` exactly when the outcome is valid.
    pub fn reason(&self) -> Option<FailureReason> {
        self.reason
    }
}

impl From<Result<bool, SignatureError>> for VerificationOutcome {
    fn from(result: Result<bool, SignatureError>) -> Self {
        match result {
            Ok(true) => Self::success(),
            Ok(false) => Self::failure(FailureReason::SignatureInvalid),
            Err(_) => Self::failure(FailureReason::DecodeError),
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            None => f.write_str("valid"),
            Some(reason) => write!(f, "invalid ({reason})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_mapping() {
        assert!(VerificationOutcome::from(Ok(true)).is_valid());
        assert_eq!(
            VerificationOutcome::from(Ok(false)).reason(),
            Some(FailureReason::SignatureInvalid)
        );
        assert_eq!(
            VerificationOutcome::from(Err(SignatureError::ScalarOutOfRange)).reason(),
            Some(FailureReason::DecodeError)
        );
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(FailureReason::SignatureInvalid.to_string(), "signature mismatch");
        assert_eq!(FailureReason::DecodeError.to_string(), "decode error");
        assert_eq!(
            VerificationOutcome::failure(FailureReason::ChallengeExpired).to_string(),
            "invalid (challenge expired)"
        );
    }
}
