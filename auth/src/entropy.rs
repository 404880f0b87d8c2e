//! Secure random source for challenge nonces.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::AuthError;

/// Fills challenge buffers with unpredictable bytes.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AuthError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AuthError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| AuthError::EntropyUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_entropy_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsEntropy.fill(&mut a).expect("os rng");
        OsEntropy.fill(&mut b).expect("os rng");
        assert_ne!(a, b);
    }
}
