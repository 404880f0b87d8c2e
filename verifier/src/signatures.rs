//! Proof types and challenge hashing.

use core::fmt;

use curve::{BaseField, ScalarField};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::SCHNORR_PROOF_SIZE;
use crate::der;
use crate::errors::SignatureError;

/// A Schnorr proof consisting of a commitment x-coordinate and a scalar.
///
/// The proof is a pair `(r, s)` where:
/// - `r` is the x-coordinate of the commitment point `R = G * k`, below p
/// - `s` is the response scalar `k + e * sk`, below n
///
/// # Structure
///
/// The proof satisfies `x(G * s - P * e) == r` where
/// `e = SHA256(r || x(P) || msg) mod n` is the Fiat-Shamir challenge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchnorrProof {
    /// Big-endian commitment x-coordinate.
    pub r: [u8; 32],
    /// The response scalar.
    pub s: ScalarField,
}

impl SchnorrProof {
    /// Parse the 64-byte `r || s` encoding.
    ///
    /// Out-of-range halves are rejected rather than reduced: `r >= p` fails
    /// with [`SignatureError::CommitmentOutOfRange`] and `s >= n` with
    /// [`SignatureError::ScalarOutOfRange`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let bytes: &[u8; SCHNORR_PROOF_SIZE] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidProofLength(bytes.len()))?;

        let mut r = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        BaseField::from_be_bytes(&r).ok_or(SignatureError::CommitmentOutOfRange)?;

        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&bytes[32..]);
        let s = ScalarField::from_be_bytes(&s_bytes).ok_or(SignatureError::ScalarOutOfRange)?;

        Ok(Self { r, s })
    }

    pub fn to_bytes(&self) -> [u8; SCHNORR_PROOF_SIZE] {
        let mut out = [0u8; SCHNORR_PROOF_SIZE];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s.to_be_bytes());
        out
    }

    /// Lowercase hex of `r` alone, as carried in `r_hex` on the wire.
    pub fn r_hex(&self) -> String {
        hex::encode(self.r)
    }

    /// Lowercase hex of `s` alone, as carried in `s_hex` on the wire.
    pub fn s_hex(&self) -> String {
        hex::encode(self.s.to_be_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse a 128-character hex string. Bad hex is reported as a length error.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s).map_err(|_| SignatureError::InvalidProofLength(s.len() / 2))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for SchnorrProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An ECDSA signature `(r, s)` with both components in `[1, n)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    pub r: ScalarField,
    pub s: ScalarField,
}

impl EcdsaSignature {
    /// Parse a strict DER `SEQUENCE { INTEGER r, INTEGER s }`.
    pub fn from_der(bytes: &[u8]) -> Result<Self, SignatureError> {
        let (r, s) = der::parse_integer_pair(bytes)?;
        let r = ScalarField::from_be_bytes(&r).ok_or(SignatureError::ScalarOutOfRange)?;
        let s = ScalarField::from_be_bytes(&s).ok_or(SignatureError::ScalarOutOfRange)?;
        if r.is_zero() || s.is_zero() {
            return Err(SignatureError::ScalarOutOfRange);
        }
        Ok(Self { r, s })
    }

    pub fn to_der(&self) -> Vec<u8> {
        der::encode_integer_pair(&self.r.to_be_bytes(), &self.s.to_be_bytes())
    }
}

/// Computes the Fiat-Shamir challenge `e = SHA256(r || pubkey_x || msg) mod n`.
///
/// The public key enters the hash in x-only form regardless of how it was
/// transmitted, so compressed and x-only keys with the same x agree on `e`.
pub fn challenge_hash(r: &[u8; 32], pubkey_x: &[u8; 32], msg: &[u8]) -> ScalarField {
    let digest: [u8; 32] = Sha256::new()
        .chain_update(r)
        .chain_update(pubkey_x)
        .chain_update(msg)
        .finalize()
        .into();
    ScalarField::from_be_bytes_reduced(&digest)
}

/// SHA-256 of `msg` reduced into the scalar field, the ECDSA `z` value.
pub(crate) fn message_scalar(msg: &[u8]) -> ScalarField {
    let digest: [u8; 32] = Sha256::digest(msg).into();
    ScalarField::from_be_bytes_reduced(&digest)
}
