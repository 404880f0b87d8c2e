//! Subject keys, challenge nonces and the record tying them together.

use core::fmt;
use std::time::{Duration, Instant};

use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Length of a challenge nonce in bytes.
pub const NONCE_LEN: usize = 32;

const COMPRESSED_KEY_LEN: usize = 33;
const LOG_KEY_HEX_CHARS: usize = 10;
const LOG_NONCE_HEX_CHARS: usize = 8;

/// The public key identifying the party being authenticated.
///
/// Holds the raw key bytes as received. Whether they decode to a curve
/// point is the verifier's concern, so any length is representable here.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubjectKey(Vec<u8>);

impl SubjectKey {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Parses the wire format: `02` or `03` followed by 64 hex digits.
    pub fn from_compressed_hex(s: &str) -> Result<Self, AuthError> {
        let valid_prefix = s.starts_with("02") || s.starts_with("03");
        if s.len() != 2 * COMPRESSED_KEY_LEN || !valid_prefix {
            return Err(AuthError::invalid("pubkey must be 02/03 followed by 64 hex digits"));
        }
        let bytes = hex::decode(s).map_err(|_| AuthError::invalid("pubkey is not hex"))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// Shows only the first few hex digits.
impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let shown = hex.get(..LOG_KEY_HEX_CHARS).unwrap_or(hex.as_str());
        write!(f, "{shown}...")
    }
}

impl fmt::Debug for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectKey({self})")
    }
}

impl From<&[u8]> for SubjectKey {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// A one-time server challenge.
///
/// Exchanged as 64 lowercase hex digits. Equality is constant time.
#[derive(Clone, Copy)]
pub struct ChallengeNonce([u8; NONCE_LEN]);

impl ChallengeNonce {
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Accepts upper or lower case hex of exactly 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, AuthError> {
        let mut bytes = [0u8; NONCE_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| AuthError::invalid("challenge must be 64 hex digits"))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short prefix safe to put in logs.
    pub fn log_prefix(&self) -> String {
        hex::encode(&self.0[..LOG_NONCE_HEX_CHARS / 2])
    }
}

impl PartialEq for ChallengeNonce {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for ChallengeNonce {}

impl fmt::Display for ChallengeNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ChallengeNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeNonce({}..)", self.log_prefix())
    }
}

/// An outstanding challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRecord {
    pub subject_key: SubjectKey,
    pub nonce: ChallengeNonce,
    pub issued_at: Instant,
}

impl ChallengeRecord {
    /// Age at `now`; zero if `now` precedes issuance.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.issued_at)
    }

    /// Expired once the age is strictly greater than `ttl`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY: &str = "039997a497d964fc1a62885b05a51166a65a90df00492c8d7cf61d6accf54803be";

    #[test]
    fn test_subject_key_wire_format() {
        let key = SubjectKey::from_compressed_hex(PUBKEY).expect("valid");
        assert_eq!(key.as_bytes().len(), 33);
        assert_eq!(key.to_hex(), PUBKEY);

        let upper = SubjectKey::from_compressed_hex(&PUBKEY.to_uppercase()).expect("valid");
        assert_eq!(upper, key);

        assert!(SubjectKey::from_compressed_hex(&PUBKEY[2..]).is_err());
        assert!(SubjectKey::from_compressed_hex(&format!("04{}", &PUBKEY[2..])).is_err());
        assert!(SubjectKey::from_compressed_hex(&format!("{}00", PUBKEY)).is_err());
        assert!(SubjectKey::from_compressed_hex(&format!("{}zz", &PUBKEY[..64])).is_err());
    }

    #[test]
    fn test_subject_key_display_truncates() {
        let key = SubjectKey::from_compressed_hex(PUBKEY).expect("valid");
        assert_eq!(key.to_string(), "039997a497...");
        assert_eq!(format!("{key:?}"), "SubjectKey(039997a497...)");
        assert_eq!(SubjectKey::from_bytes(&[0xab]).to_string(), "ab...");
    }

    #[test]
    fn test_nonce_hex_and_equality() {
        let nonce = ChallengeNonce::from_bytes([0xab; NONCE_LEN]);
        assert_eq!(nonce.to_hex(), "ab".repeat(32));
        assert_eq!(ChallengeNonce::from_hex(&"AB".repeat(32)).expect("hex"), nonce);
        assert_ne!(ChallengeNonce::from_bytes([0xac; NONCE_LEN]), nonce);
        assert_eq!(nonce.log_prefix(), "abababab");
        assert!(ChallengeNonce::from_hex(&"ab".repeat(31)).is_err());
        assert!(ChallengeNonce::from_hex(&"g".repeat(64)).is_err());
    }

    #[test]
    fn test_record_expiry_is_strict() {
        let issued_at = Instant::now();
        let record = ChallengeRecord {
            subject_key: SubjectKey::from_bytes(&[2u8; 33]),
            nonce: ChallengeNonce::from_bytes([0; NONCE_LEN]),
            issued_at,
        };
        let ttl = Duration::from_secs(300);
        assert!(!record.is_expired(issued_at + ttl, ttl));
        assert!(record.is_expired(issued_at + ttl + Duration::from_secs(1), ttl));
        assert_eq!(record.age(issued_at), Duration::ZERO);
    }
}
