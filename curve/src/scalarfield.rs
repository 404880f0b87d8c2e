//! Scalar field of the curve. n = 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order.

use serde::{Deserialize, Serialize};

use crate::group::ScalarBits;
use crate::montgomery::impl_montgomery_field;

/// Scalar field element for the curve
/// Represented in Montgomery form with [u64; 4]
#[derive(Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    /// Montgomery form: value * R mod n, where R = 2^256
    limbs: [u64; 4],
}

// Group order: n = 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
const MODULUS: [u64; 4] = [
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
];

// R = 2^256 mod n (Montgomery parameter)
const R: [u64; 4] = [
    0x402da1732fc9bebf,
    0x4551231950b75fc4,
    0x0000000000000001,
    0x0000000000000000,
];

// R^2 = 2^512 mod n (for Montgomery conversion)
const R2: [u64; 4] = [
    0x896cf21467d7d140,
    0x741496c20e7cf878,
    0xe697f5e45bcd07c6,
    0x9d671cd581c69bc5,
];

// -n^{-1} mod 2^64 (Montgomery parameter mu)
const MU: u64 = 0x4b0dff665588b13f;

impl_montgomery_field!(ScalarField);

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_limbs()
    }
}
