//! Base field of secp256k1. p = 2^256 - 2^32 - 977
//!
//! Montgomery form over [u64; 4], little-endian limbs.

use serde::{Deserialize, Serialize};

use crate::montgomery::impl_montgomery_field;

/// Element of the secp256k1 coordinate field.
#[derive(Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseField {
    /// Montgomery form: value * R mod p, where R = 2^256
    limbs: [u64; 4],
}

// Field modulus: p = 0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f
const MODULUS: [u64; 4] = [
    0xfffffffefffffc2f,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0xffffffffffffffff,
];

// R = 2^256 mod p
const R: [u64; 4] = [0x00000001000003d1, 0, 0, 0];

// R^2 = 2^512 mod p
const R2: [u64; 4] = [0x000007a2000e90a1, 0x0000000000000001, 0, 0];

// -p^{-1} mod 2^64
const MU: u64 = 0xd838091dd2253531;

// (p + 1) / 4, the square-root exponent (p = 3 mod 4)
const SQRT_EXP: [u64; 4] = [
    0xffffffffbfffff0c,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x3fffffffffffffff,
];

impl_montgomery_field!(BaseField);

impl BaseField {
    /// Square root, if one exists.
    ///
    /// Returns the root `y0 = a^((p+1)/4)`; the caller picks `y0` or `-y0`
    /// by parity. `None` when `a` is not a quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        let root = self.pow_vartime(SQRT_EXP);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}
