//! Sizes used by the proof encodings.

/// Size of a compressed SEC1 verifying key in bytes.
///
/// A parity prefix (`0x02` even, `0x03` odd) followed by the 32-byte
/// big-endian x-coordinate.
pub const PK_SIZE: usize = 33;

/// Size of an x-only verifying key in bytes (y assumed even).
pub const X_ONLY_PK_SIZE: usize = 32;

/// Size of a serialized secret signing key in bytes.
pub const SK_SIZE: usize = 32;

/// Size of a serialized Schnorr proof in bytes.
///
/// A Schnorr proof consists of:
/// - The commitment x-coordinate r (32 bytes, below p)
/// - The response scalar s (32 bytes, below n)
///
/// Total: 64 bytes
pub const SCHNORR_PROOF_SIZE: usize = 64;

/// Smallest DER signature accepted: two one-byte integers.
pub(crate) const DER_MIN_SIZE: usize = 8;

/// Largest DER signature accepted: two 33-byte integers.
pub(crate) const DER_MAX_SIZE: usize = 72;
