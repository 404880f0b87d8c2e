//! Schnorr and ECDSA proof verification over secp256k1.
//!
//! This library implements the server side of a challenge-response login:
//! - BIP-340-style Schnorr proofs `(r, s)` with `e = SHA256(r || x(P) || msg) mod n`
//! - ECDSA signatures in strict DER over `SHA256(msg)`
//! - A fixed failure taxonomy reported through [`VerificationOutcome`]
//!
//! # Overview
//!
//! Verifiers never return errors. Malformed keys, malformed proofs and
//! out-of-range values all become a `decode error` outcome, while a clean
//! arithmetic mismatch becomes `signature mismatch`.
//!
//! # Example
//!
//! ```
//! use verifier::{ProofVerifier, SchnorrVerifier, SigningKey};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let signing_key = SigningKey::random(&mut rng);
//! let subject_key = signing_key.verifying_key().to_compressed();
//!
//! let nonce = [0x5a; 32];
//! let proof = signing_key.sign_schnorr(&nonce).expect("signing failed");
//!
//! let outcome = SchnorrVerifier.verify(&subject_key, &proof.to_bytes(), &nonce);
//! assert!(outcome.is_valid());
//! ```
//!
//! # Security Considerations
//!
//! - Signing keys are for clients and tests; the server never holds one
//! - Keys presented in x-only form must be normalized to an even y first
//! - Failure reasons are meant for internal logs, not for end users

mod constants;
mod der;
mod errors;
mod keys;
mod outcome;
mod signatures;
mod verify;


pub use constants::{PK_SIZE, SCHNORR_PROOF_SIZE, SK_SIZE, X_ONLY_PK_SIZE};
pub use der::DerError;
pub use errors::SignatureError;
pub use keys::{SigningKey, VerifyingKey};
pub use outcome::{FailureReason, VerificationOutcome};
pub use signatures::{EcdsaSignature, SchnorrProof, challenge_hash};
pub use verify::{EcdsaVerifier, ProofVerifier, SchnorrVerifier, UnknownVerifierMode, VerifierMode};
