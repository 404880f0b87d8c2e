use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::{BaseField, ScalarField};

/// Helper trait for sampling random field elements.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Sample until the value is non-zero.
    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for BaseField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value = Self::random(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value = Self::random(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}
