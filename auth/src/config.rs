//! Authentication settings.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use verifier::VerifierMode;

use crate::error::ConfigError;

pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_SWEEP_ONE_IN: u32 = 10;

const ENV_CHALLENGE_TTL: &str = "CHALLENGE_TTL";
const ENV_SWEEP_ONE_IN: &str = "CHALLENGE_SWEEP_ONE_IN";
const ENV_VERIFIER: &str = "AUTH_VERIFIER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Maximum challenge age, in whole seconds on the wire.
    #[serde(with = "seconds")]
    pub challenge_ttl: Duration,
    /// Sweep expired challenges on roughly one issuance in this many.
    /// `0` disables opportunistic sweeping.
    pub sweep_one_in: u32,
    pub verifier: VerifierMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            challenge_ttl: DEFAULT_CHALLENGE_TTL,
            sweep_one_in: DEFAULT_SWEEP_ONE_IN,
            verifier: VerifierMode::default(),
        }
    }
}

impl AuthConfig {
    /// Reads overrides from `CHALLENGE_TTL`, `CHALLENGE_SWEEP_ONE_IN` and
    /// `AUTH_VERIFIER`; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CHALLENGE_TTL) {
            let secs: u64 = parse(ENV_CHALLENGE_TTL, &value)?;
            config.challenge_ttl = Duration::from_secs(secs);
        }
        if let Some(value) = lookup(ENV_SWEEP_ONE_IN) {
            config.sweep_one_in = parse(ENV_SWEEP_ONE_IN, &value)?;
        }
        if let Some(value) = lookup(ENV_VERIFIER) {
            config.verifier = parse(ENV_VERIFIER, &value)?;
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

mod seconds {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
