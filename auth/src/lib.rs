//! Challenge-response login over secp256k1 keys.
//!
//! A client asks for a challenge, signs the 32 challenge bytes with the key
//! it claims to own, and returns the proof. The server consumes the
//! challenge exactly once, checks its age and the echoed value, then hands
//! the proof to the configured verifier.
//!
//! # Example
//!
//! ```
//! use auth::{AuthConfig, Authenticator, SubjectKey};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use verifier::SigningKey;
//!
//! let auth = Authenticator::new(&AuthConfig::default());
//! let signer = SigningKey::random(&mut StdRng::seed_from_u64(3));
//! let subject = SubjectKey::from_bytes(&signer.verifying_key().to_compressed());
//!
//! let nonce = auth.begin_login(&subject).expect("entropy available");
//! let proof = signer.sign_schnorr(nonce.as_bytes()).expect("signing failed");
//!
//! let outcome = auth.complete_login(&subject, &nonce.to_hex(), &proof.to_bytes());
//! assert!(outcome.is_valid());
//! ```

mod clock;
mod config;
mod directory;
mod entropy;
mod error;
mod orchestrator;
mod record;
mod service;
mod store;
mod wire;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthConfig, DEFAULT_CHALLENGE_TTL, DEFAULT_SWEEP_ONE_IN};
pub use directory::{IdentityDirectory, MemoryDirectory};
pub use entropy::{EntropySource, OsEntropy};
pub use error::{AuthError, ConfigError};
pub use orchestrator::{Authenticator, LoginState};
pub use record::{ChallengeNonce, ChallengeRecord, NONCE_LEN, SubjectKey};
pub use service::LoginService;
pub use store::ChallengeStore;
pub use wire::{
    ChallengeRequest, ChallengeResponse, EcdsaLogin, LoginRequest, LoginResponse, SchnorrLogin,
    ValidatedLogin,
};
