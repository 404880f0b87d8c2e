//! Lazily built 4-bit window table for the base point.

use std::sync::OnceLock;

use crate::group::{window_table, ScalarBits};
use crate::{Affine, Projective, ScalarField};

static GENERATOR_TABLE: OnceLock<[Projective; 16]> = OnceLock::new();

/// `[O, G, 2G, ..., 15G]`
pub(crate) fn generator_table() -> &'static [Projective; 16] {
    GENERATOR_TABLE.get_or_init(|| window_table(&Projective::generator()))
}

pub(crate) fn mul_generator_projective(scalar: &ScalarField) -> Projective {
    let table = generator_table();
    let limbs = scalar.to_u64_limbs();
    let mut result = Projective::INFINITY;

    for &limb in limbs.iter().rev() {
        for shift in (0..64).step_by(4).rev() {
            result = result.double().double().double().double();
            let window = ((limb >> shift) & 0xF) as usize;
            if window != 0 {
                result += table[window];
            }
        }
    }

    result
}

/// Multiply the base point by `scalar`.
pub fn mul_generator_affine(scalar: &ScalarField) -> Affine {
    mul_generator_projective(scalar).to_affine()
}
