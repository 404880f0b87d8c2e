//! Proof verifiers and the mode selector.
//!
//! Verifiers are stateless: they take the subject key, the proof and the
//! message bytes, and map every decoding or arithmetic problem to an outcome
//! instead of an error.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SignatureError;
use crate::keys::VerifyingKey;
use crate::outcome::VerificationOutcome;
use crate::signatures::{EcdsaSignature, SchnorrProof};

/// Checks a proof of key possession over a message.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, subject_key: &[u8], proof: &[u8], message: &[u8]) -> VerificationOutcome;
}

/// BIP-340-style Schnorr verification over a 64-byte `r || s` proof.
///
/// Accepts 33-byte compressed and 32-byte x-only subject keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrVerifier;

impl SchnorrVerifier {
    fn check(subject_key: &[u8], proof: &[u8], message: &[u8]) -> Result<bool, SignatureError> {
        let key = VerifyingKey::from_bytes(subject_key)?;
        let proof = SchnorrProof::from_bytes(proof)?;
        key.verify_schnorr(message, &proof)
    }
}

impl ProofVerifier for SchnorrVerifier {
    fn verify(&self, subject_key: &[u8], proof: &[u8], message: &[u8]) -> VerificationOutcome {
        Self::check(subject_key, proof, message).into()
    }
}

/// ECDSA verification of a DER signature over `SHA256(message)`.
///
/// Only 33-byte compressed subject keys are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl EcdsaVerifier {
    fn check(subject_key: &[u8], der: &[u8], message: &[u8]) -> Result<bool, SignatureError> {
        let key = VerifyingKey::from_compressed(subject_key)?;
        let sig = EcdsaSignature::from_der(der)?;
        key.verify_ecdsa(message, &sig)
    }
}

impl ProofVerifier for EcdsaVerifier {
    fn verify(&self, subject_key: &[u8], proof: &[u8], message: &[u8]) -> VerificationOutcome {
        Self::check(subject_key, proof, message).into()
    }
}

/// Which proof kind a deployment accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierMode {
    #[default]
    Schnorr,
    Ecdsa,
}

impl VerifierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifierMode::Schnorr => "schnorr",
            VerifierMode::Ecdsa => "ecdsa",
        }
    }
}

impl fmt::Display for VerifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verifier mode {0:?}, expected \"schnorr\" or \"ecdsa\"")]
pub struct UnknownVerifierMode(pub String);

impl FromStr for VerifierMode {
    type Err = UnknownVerifierMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "schnorr" => Ok(VerifierMode::Schnorr),
            "ecdsa" => Ok(VerifierMode::Ecdsa),
            _ => Err(UnknownVerifierMode(s.to_string())),
        }
    }
}

impl ProofVerifier for VerifierMode {
    fn verify(&self, subject_key: &[u8], proof: &[u8], message: &[u8]) -> VerificationOutcome {
        match self {
            VerifierMode::Schnorr => SchnorrVerifier.verify(subject_key, proof, message),
            VerifierMode::Ecdsa => EcdsaVerifier.verify(subject_key, proof, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("schnorr".parse(), Ok(VerifierMode::Schnorr));
        assert_eq!(" ECDSA ".parse(), Ok(VerifierMode::Ecdsa));
        assert!("rsa".parse::<VerifierMode>().is_err());
        assert_eq!(VerifierMode::default(), VerifierMode::Schnorr);
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [VerifierMode::Schnorr, VerifierMode::Ecdsa] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }
}
