//! Login attempt state machine.
//!
//! `Start -> ChallengeLookup -> FreshnessCheck -> MatchCheck -> SignatureVerify`
//! ending in `Success` or `Failure(reason)`. The challenge is consumed before
//! anything else is checked, so an abandoned or failed attempt still burns it.

use std::sync::Arc;

use verifier::{FailureReason, ProofVerifier, VerificationOutcome, VerifierMode};

use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::entropy::EntropySource;
use crate::error::AuthError;
use crate::record::{ChallengeNonce, SubjectKey};
use crate::store::ChallengeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Start,
    ChallengeLookup,
    FreshnessCheck,
    MatchCheck,
    SignatureVerify,
    Success,
    Failure(FailureReason),
}

impl LoginState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginState::Success | LoginState::Failure(_))
    }
}

impl From<VerificationOutcome> for LoginState {
    fn from(outcome: VerificationOutcome) -> Self {
        match outcome.reason() {
            None => LoginState::Success,
            Some(reason) => LoginState::Failure(reason),
        }
    }
}

/// Tracks one attempt so each transition is logged in order.
struct Attempt<'a> {
    subject: &'a SubjectKey,
    state: LoginState,
}

impl<'a> Attempt<'a> {
    fn new(subject: &'a SubjectKey) -> Self {
        Self {
            subject,
            state: LoginState::Start,
        }
    }

    fn advance(&mut self, next: LoginState) {
        tracing::debug!(subject = %self.subject, from = ?self.state, to = ?next, "login transition");
        self.state = next;
    }

    fn fail(mut self, reason: FailureReason) -> VerificationOutcome {
        self.advance(LoginState::Failure(reason));
        tracing::warn!(subject = %self.subject, reason = %reason, "login failed");
        VerificationOutcome::failure(reason)
    }

    fn finish(mut self, outcome: VerificationOutcome) -> VerificationOutcome {
        self.advance(outcome.into());
        match outcome.reason() {
            None => tracing::info!(subject = %self.subject, "proof verified"),
            Some(reason) => {
                tracing::warn!(subject = %self.subject, reason = %reason, "login failed")
            }
        }
        outcome
    }
}

/// Coordinates the challenge store and the configured verifier.
pub struct Authenticator {
    store: ChallengeStore,
    verifier: Arc<dyn ProofVerifier>,
    mode: VerifierMode,
}

impl Authenticator {
    /// Build from configuration on the system clock and OS entropy.
    pub fn new(config: &AuthConfig) -> Self {
        let store = ChallengeStore::new(config.challenge_ttl, config.sweep_one_in);
        Self::with_store(store, config.verifier)
    }

    pub fn with_sources(
        config: &AuthConfig,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
    ) -> Self {
        let store =
            ChallengeStore::with_sources(config.challenge_ttl, config.sweep_one_in, clock, entropy);
        Self::with_store(store, config.verifier)
    }

    pub fn with_store(store: ChallengeStore, mode: VerifierMode) -> Self {
        Self {
            store,
            verifier: Arc::new(mode),
            mode,
        }
    }

    pub fn mode(&self) -> VerifierMode {
        self.mode
    }

    pub fn store(&self) -> &ChallengeStore {
        &self.store
    }

    /// Issue a challenge for `subject`.
    ///
    /// The caller is responsible for checking that `subject` is a registered
    /// identity first.
    pub fn begin_login(&self, subject: &SubjectKey) -> Result<ChallengeNonce, AuthError> {
        self.store.issue_challenge(subject)
    }

    /// Consume the outstanding challenge for `subject` and check `proof` against it.
    ///
    /// # Arguments
    ///
    /// * `subject` - The key the challenge was issued to
    /// * `claimed_challenge_hex` - The challenge the client says it signed
    /// * `proof` - Raw proof bytes in the configured mode's format
    pub fn complete_login(
        &self,
        subject: &SubjectKey,
        claimed_challenge_hex: &str,
        proof: &[u8],
    ) -> VerificationOutcome {
        let mut attempt = Attempt::new(subject);

        attempt.advance(LoginState::ChallengeLookup);
        let Some(record) = self.store.consume_challenge(subject) else {
            return attempt.fail(FailureReason::NoActiveChallenge);
        };

        attempt.advance(LoginState::FreshnessCheck);
        if record.is_expired(self.store.clock().now(), self.store.ttl()) {
            return attempt.fail(FailureReason::ChallengeExpired);
        }

        attempt.advance(LoginState::MatchCheck);
        match ChallengeNonce::from_hex(claimed_challenge_hex) {
            Ok(claimed) if claimed == record.nonce => {}
            _ => return attempt.fail(FailureReason::ChallengeMismatch),
        }

        attempt.advance(LoginState::SignatureVerify);
        let outcome = self
            .verifier
            .verify(subject.as_bytes(), proof, record.nonce.as_bytes());
        attempt.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::entropy::OsEntropy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;
    use verifier::SigningKey;

    struct Fixture {
        clock: Arc<ManualClock>,
        auth: Authenticator,
        signer: SigningKey,
        subject: SubjectKey,
    }

    fn fixture(mode: VerifierMode) -> Fixture {
        let clock = ManualClock::shared();
        let config = AuthConfig {
            verifier: mode,
            sweep_one_in: 0,
            ..AuthConfig::default()
        };
        let auth = Authenticator::with_sources(&config, clock.clone(), Arc::new(OsEntropy));
        let signer = SigningKey::random(&mut StdRng::seed_from_u64(42));
        let subject = SubjectKey::from_bytes(&signer.verifying_key().to_compressed());
        Fixture {
            clock,
            auth,
            signer,
            subject,
        }
    }

    fn schnorr(signer: &SigningKey, nonce: &ChallengeNonce) -> Vec<u8> {
        signer.sign_schnorr(nonce.as_bytes()).expect("sign").to_bytes().to_vec()
    }

    #[test]
    fn test_valid_login() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);

        let outcome = f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof);
        assert!(outcome.is_valid());
        assert!(f.auth.store().is_empty());
    }

    #[test]
    fn test_no_replay() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);

        assert!(f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof).is_valid());
        let replay = f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof);
        assert_eq!(replay.reason(), Some(FailureReason::NoActiveChallenge));
    }

    #[test]
    fn test_expired_challenge() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);

        f.clock.advance(Duration::from_secs(301));
        let outcome = f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof);
        assert_eq!(outcome.reason(), Some(FailureReason::ChallengeExpired));
        assert!(f.auth.store().is_empty());
    }

    #[test]
    fn test_challenge_at_exact_ttl_still_valid() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);

        f.clock.advance(Duration::from_secs(300));
        assert!(f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof).is_valid());
    }

    #[test]
    fn test_claimed_challenge_differs_by_one_char() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);

        let mut claimed = nonce.to_hex().into_bytes();
        claimed[0] = if claimed[0] == b'0' { b'1' } else { b'0' };
        let claimed = String::from_utf8(claimed).expect("ascii");

        let outcome = f.auth.complete_login(&f.subject, &claimed, &proof);
        assert_eq!(outcome.reason(), Some(FailureReason::ChallengeMismatch));

        // The mismatch consumed the challenge.
        let retry = f.auth.complete_login(&f.subject, &nonce.to_hex(), &proof);
        assert_eq!(retry.reason(), Some(FailureReason::NoActiveChallenge));
    }

    #[test]
    fn test_uppercase_claim_matches() {
        let f = fixture(VerifierMode::Schnorr);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);
        let claimed = nonce.to_hex().to_uppercase();
        assert!(f.auth.complete_login(&f.subject, &claimed, &proof).is_valid());
    }

    #[test]
    fn test_proof_bound_to_its_challenge() {
        let f = fixture(VerifierMode::Schnorr);
        let other = SubjectKey::from_bytes(
            &SigningKey::random(&mut StdRng::seed_from_u64(7))
                .verifying_key()
                .to_compressed(),
        );

        // A and B are both outstanding; the proof is for A, presented against B.
        let a = f.auth.begin_login(&other).expect("issue");
        let b = f.auth.begin_login(&f.subject).expect("issue");
        let proof_for_a = schnorr(&f.signer, &a);

        let outcome = f.auth.complete_login(&f.subject, &b.to_hex(), &proof_for_a);
        assert_eq!(outcome.reason(), Some(FailureReason::SignatureInvalid));
    }

    #[test]
    fn test_x_only_subject_key() {
        let f = fixture(VerifierMode::Schnorr);
        let signer = f.signer.normalized_for_x_only();
        let subject = SubjectKey::from_bytes(&signer.verifying_key().x_only());

        let nonce = f.auth.begin_login(&subject).expect("issue");
        let proof = schnorr(&signer, &nonce);
        assert!(f.auth.complete_login(&subject, &nonce.to_hex(), &proof).is_valid());
    }

    #[test]
    fn test_oversized_subject_key_is_decode_error() {
        let f = fixture(VerifierMode::Schnorr);
        let mut bytes = f.signer.verifying_key().to_compressed().to_vec();
        bytes.push(0);
        let subject = SubjectKey::from_bytes(&bytes);

        let nonce = f.auth.begin_login(&subject).expect("issue");
        let proof = schnorr(&f.signer, &nonce);
        let outcome = f.auth.complete_login(&subject, &nonce.to_hex(), &proof);
        assert_eq!(outcome.reason(), Some(FailureReason::DecodeError));
    }

    #[test]
    fn test_ecdsa_mode() {
        let f = fixture(VerifierMode::Ecdsa);
        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let der = f.signer.sign_ecdsa(nonce.as_bytes()).expect("sign").to_der();
        assert!(f.auth.complete_login(&f.subject, &nonce.to_hex(), &der).is_valid());

        let nonce = f.auth.begin_login(&f.subject).expect("issue");
        let schnorr_proof = schnorr(&f.signer, &nonce);
        let outcome = f.auth.complete_login(&f.subject, &nonce.to_hex(), &schnorr_proof);
        assert_eq!(outcome.reason(), Some(FailureReason::DecodeError));
    }

    #[test]
    fn test_never_issued() {
        let f = fixture(VerifierMode::Schnorr);
        let outcome = f.auth.complete_login(&f.subject, &"00".repeat(32), &[0u8; 64]);
        assert_eq!(outcome.reason(), Some(FailureReason::NoActiveChallenge));
    }

    #[test]
    fn test_login_state_terminal() {
        assert!(!LoginState::Start.is_terminal());
        assert!(!LoginState::SignatureVerify.is_terminal());
        assert_eq!(LoginState::from(VerificationOutcome::success()), LoginState::Success);
        let failed = LoginState::from(VerificationOutcome::failure(FailureReason::ChallengeExpired));
        assert_eq!(failed, LoginState::Failure(FailureReason::ChallengeExpired));
        assert!(failed.is_terminal());
    }
}
