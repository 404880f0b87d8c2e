//! JSON payloads exchanged with clients.
//!
//! Field names follow the existing client protocol (`challengeHex`, `R_hex`).

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::record::SubjectKey;

const SCALAR_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRequest {
    pub pubkey: String,
}

impl ChallengeRequest {
    pub fn subject_key(&self) -> Result<SubjectKey, AuthError> {
        SubjectKey::from_compressed_hex(&self.pubkey)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    #[serde(rename = "challengeHex")]
    pub challenge_hex: String,
}

/// Schnorr login: the proof travels as separate `r` and `s` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrLogin {
    pub pubkey: String,
    #[serde(rename = "r_hex", alias = "R_hex")]
    pub r_hex: String,
    pub s_hex: String,
    #[serde(rename = "challengeHex")]
    pub challenge_hex: String,
}

/// ECDSA login: the proof travels as hex-encoded DER.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaLogin {
    pub pubkey: String,
    pub signature_der: String,
    #[serde(rename = "challengeHex")]
    pub challenge_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoginRequest {
    Schnorr(SchnorrLogin),
    Ecdsa(EcdsaLogin),
}

/// A login request after validation, ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLogin {
    pub subject: SubjectKey,
    pub claimed_challenge_hex: String,
    pub proof: Vec<u8>,
}

fn check_hex64(field: &str, value: &str) -> Result<(), AuthError> {
    if value.len() == SCALAR_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(AuthError::invalid(format!("{field} must be 64 hex digits")))
    }
}

impl LoginRequest {
    pub fn pubkey(&self) -> &str {
        match self {
            LoginRequest::Schnorr(req) => &req.pubkey,
            LoginRequest::Ecdsa(req) => &req.pubkey,
        }
    }

    /// Check field formats and decode the proof bytes.
    ///
    /// Range checks on the decoded values are left to the verifier.
    pub fn validate(&self) -> Result<ValidatedLogin, AuthError> {
        let subject = SubjectKey::from_compressed_hex(self.pubkey())?;
        match self {
            LoginRequest::Schnorr(req) => {
                check_hex64("challengeHex", &req.challenge_hex)?;
                check_hex64("r_hex", &req.r_hex)?;
                check_hex64("s_hex", &req.s_hex)?;
                let mut proof = hex::decode(&req.r_hex)
                    .map_err(|_| AuthError::invalid("r_hex is not hex"))?;
                proof.extend(
                    hex::decode(&req.s_hex).map_err(|_| AuthError::invalid("s_hex is not hex"))?,
                );
                Ok(ValidatedLogin {
                    subject,
                    claimed_challenge_hex: req.challenge_hex.clone(),
                    proof,
                })
            }
            LoginRequest::Ecdsa(req) => {
                check_hex64("challengeHex", &req.challenge_hex)?;
                let proof = hex::decode(&req.signature_der)
                    .map_err(|_| AuthError::invalid("signature_der must be even-length hex"))?;
                Ok(ValidatedLogin {
                    subject,
                    claimed_challenge_hex: req.challenge_hex.clone(),
                    proof,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: Option<String>,
}

impl LoginResponse {
    pub const SUCCESS_MESSAGE: &'static str = "Login successful!";
    pub const FAILURE_MESSAGE: &'static str = "Authentication failed";

    pub fn success(username: Option<String>) -> Self {
        Self {
            success: true,
            message: Self::SUCCESS_MESSAGE.to_string(),
            username,
        }
    }

    /// The same response for every failure reason.
    pub fn failure() -> Self {
        Self {
            success: false,
            message: Self::FAILURE_MESSAGE.to_string(),
            username: None,
        }
    }
}
