//! Error types for proof decoding, signing and verification.

use curve::DecodeError;

use crate::der::DerError;

/// Errors that can occur while decoding or checking a proof.
///
/// None of these cross the verifier boundary: [`crate::ProofVerifier`]
/// folds every variant into a `decode error` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The verifying key could not be decoded into a curve point.
    #[error("invalid public key: {0}")]
    InvalidKey(#[from] DecodeError),

    /// A point at infinity was encountered where a valid curve point was expected.
    #[error("point at infinity")]
    InvalidPoint,

    /// The proof does not have the fixed Schnorr length.
    #[error("proof must be 64 bytes, got {0}")]
    InvalidProofLength(usize),

    /// The commitment coordinate `r` is not below the field modulus.
    #[error("commitment coordinate out of range")]
    CommitmentOutOfRange,

    /// A scalar is zero or not below the group order.
    #[error("scalar out of range")]
    ScalarOutOfRange,

    /// The ECDSA signature is not valid DER.
    #[error("malformed DER signature: {0}")]
    Der(#[from] DerError),

    /// A derived signing nonce was zero (negligible probability).
    #[error("degenerate signing nonce")]
    InvalidNonce,
}
