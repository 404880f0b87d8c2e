//! One-time challenge store.
//!
//! Every mutation runs under a single mutex, so `consume_challenge` is atomic
//! with respect to concurrent issuance and sweeping: a record is handed out
//! at most once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;

use crate::clock::{Clock, SystemClock};
use crate::entropy::{EntropySource, OsEntropy};
use crate::error::AuthError;
use crate::record::{ChallengeNonce, ChallengeRecord, NONCE_LEN, SubjectKey};

/// Outstanding challenges keyed by subject key.
///
/// # Security Properties
///
/// - At most one outstanding challenge per key; reissuing overwrites
/// - Consumption removes the record whatever the verification result
/// - Expiry is judged at consumption time by the caller, so sweeping is
///   housekeeping only
pub struct ChallengeStore {
    records: Mutex<HashMap<SubjectKey, ChallengeRecord>>,
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn EntropySource>,
    ttl: Duration,
    sweep_one_in: u32,
}

impl ChallengeStore {
    /// Create a store on the system clock and OS entropy.
    ///
    /// # Arguments
    ///
    /// * `ttl` - Age past which records are dropped by sweeps.
    /// * `sweep_one_in` - Sweep on roughly one issuance in this many; `0` never sweeps.
    pub fn new(ttl: Duration, sweep_one_in: u32) -> Self {
        Self::with_sources(ttl, sweep_one_in, Arc::new(SystemClock), Arc::new(OsEntropy))
    }

    pub fn with_sources(
        ttl: Duration,
        sweep_one_in: u32,
        clock: Arc<dyn Clock>,
        entropy: Arc<dyn EntropySource>,
    ) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
            entropy,
            ttl,
            sweep_one_in,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Issue a fresh challenge for `key`, replacing any outstanding one.
    ///
    /// # Errors
    ///
    /// `AuthError::EntropyUnavailable` if the random source fails. Nothing is
    /// recorded in that case.
    pub fn issue_challenge(&self, key: &SubjectKey) -> Result<ChallengeNonce, AuthError> {
        let mut bytes = [0u8; NONCE_LEN];
        if let Err(err) = self.entropy.fill(&mut bytes) {
            tracing::error!(subject = %key, "challenge entropy unavailable: {}", err);
            return Err(err);
        }
        let nonce = ChallengeNonce::from_bytes(bytes);

        let record = ChallengeRecord {
            subject_key: key.clone(),
            nonce,
            issued_at: self.clock.now(),
        };

        let mut records = self.records.lock();
        if records.insert(key.clone(), record).is_some() {
            tracing::debug!(subject = %key, "replaced outstanding challenge");
        }
        if self.should_sweep() {
            let removed = Self::sweep_locked(&mut records, self.clock.now(), self.ttl);
            tracing::debug!(removed, remaining = records.len(), "opportunistic challenge sweep");
        }
        drop(records);

        tracing::info!(subject = %key, challenge = %nonce.log_prefix(), "issued challenge");
        Ok(nonce)
    }

    /// Remove and return the record for `key`, if any.
    pub fn consume_challenge(&self, key: &SubjectKey) -> Option<ChallengeRecord> {
        self.records.lock().remove(key)
    }

    /// Drop every record older than `ttl`. Returns how many were removed.
    pub fn sweep_expired(&self, ttl: Duration) -> usize {
        let mut records = self.records.lock();
        let removed = Self::sweep_locked(&mut records, self.clock.now(), ttl);
        tracing::debug!(removed, remaining = records.len(), "swept expired challenges");
        removed
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    fn should_sweep(&self) -> bool {
        match self.sweep_one_in {
            0 => false,
            1 => true,
            n => rand::rng().random_ratio(1, n),
        }
    }

    fn sweep_locked(
        records: &mut HashMap<SubjectKey, ChallengeRecord>,
        now: std::time::Instant,
        ttl: Duration,
    ) -> usize {
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now, ttl));
        before - records.len()
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CHALLENGE_TTL, crate::config::DEFAULT_SWEEP_ONE_IN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::thread;

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), AuthError> {
            Err(AuthError::EntropyUnavailable("device missing".into()))
        }
    }

    fn key(tag: u8) -> SubjectKey {
        let mut bytes = [tag; 33];
        bytes[0] = 0x02;
        SubjectKey::from_bytes(&bytes)
    }

    fn manual_store(clock: Arc<ManualClock>, sweep_one_in: u32) -> ChallengeStore {
        ChallengeStore::with_sources(
            Duration::from_secs(300),
            sweep_one_in,
            clock,
            Arc::new(OsEntropy),
        )
    }

    #[test]
    fn test_issue_then_consume_once() {
        let store = ChallengeStore::default();
        let nonce = store.issue_challenge(&key(1)).expect("issue");
        assert_eq!(store.len(), 1);

        let record = store.consume_challenge(&key(1)).expect("present");
        assert_eq!(record.nonce, nonce);
        assert_eq!(record.subject_key, key(1));
        assert!(store.consume_challenge(&key(1)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_reissue_overwrites() {
        let store = ChallengeStore::default();
        let first = store.issue_challenge(&key(1)).expect("issue");
        let second = store.issue_challenge(&key(1)).expect("issue");
        assert_ne!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(store.consume_challenge(&key(1)).expect("present").nonce, second);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = ChallengeStore::default();
        let a = store.issue_challenge(&key(1)).expect("issue");
        let b = store.issue_challenge(&key(2)).expect("issue");
        assert_eq!(store.consume_challenge(&key(2)).expect("present").nonce, b);
        assert_eq!(store.consume_challenge(&key(1)).expect("present").nonce, a);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let clock = ManualClock::shared();
        let store = manual_store(clock.clone(), 0);

        store.issue_challenge(&key(1)).expect("issue");
        clock.advance(Duration::from_secs(200));
        store.issue_challenge(&key(2)).expect("issue");
        clock.advance(Duration::from_secs(101));

        assert_eq!(store.sweep_expired(Duration::from_secs(300)), 1);
        assert!(store.consume_challenge(&key(1)).is_none());
        assert!(store.consume_challenge(&key(2)).is_some());
    }

    #[test]
    fn test_opportunistic_sweep_on_issue() {
        let clock = ManualClock::shared();
        let store = manual_store(clock.clone(), 1);

        store.issue_challenge(&key(1)).expect("issue");
        clock.advance(Duration::from_secs(301));
        store.issue_challenge(&key(2)).expect("issue");

        assert_eq!(store.len(), 1);
        assert!(store.consume_challenge(&key(1)).is_none());
    }

    #[test]
    fn test_entropy_failure_records_nothing() {
        let store = ChallengeStore::with_sources(
            Duration::from_secs(300),
            0,
            Arc::new(SystemClock),
            Arc::new(BrokenEntropy),
        );
        let err = store.issue_challenge(&key(1)).expect_err("no entropy");
        assert!(err.is_fatal());
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_consume_yields_one_record() {
        let store = Arc::new(ChallengeStore::default());
        for round in 0..20u8 {
            store.issue_challenge(&key(round)).expect("issue");

            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    thread::spawn(move || store.consume_challenge(&key(round)).is_some())
                })
                .collect();

            let winners = handles
                .into_iter()
                .map(|h| h.join().expect("thread"))
                .filter(|won| *won)
                .count();
            assert_eq!(winners, 1);
        }
    }
}
