//! Four-limb Montgomery kernel shared by the base field and the scalar field.
//!
//! Limbs are little-endian `u64`s. Both secp256k1 moduli sit just below
//! 2^256, so every routine here tracks the carry out of the top limb instead
//! of assuming headroom.

pub(crate) type Limbs = [u64; 4];

/// Carrying addition
#[inline]
pub(crate) const fn carrying_add(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (sum, overflow1) = a.overflowing_add(b);
    let (sum, overflow2) = sum.overflowing_add(carry as u64);
    (sum, overflow1 || overflow2)
}

/// Borrowing subtraction
#[inline]
pub(crate) const fn borrowing_sub(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (diff, overflow1) = a.overflowing_sub(b);
    let (diff, overflow2) = diff.overflowing_sub(borrow as u64);
    (diff, overflow1 || overflow2)
}

/// Plain 256-bit subtraction, returning the wrapped difference and the final borrow.
#[inline]
pub(crate) const fn sub_limbs(a: Limbs, b: Limbs) -> (Limbs, bool) {
    let (r0, borrow) = a[0].overflowing_sub(b[0]);
    let (r1, borrow) = borrowing_sub(a[1], b[1], borrow);
    let (r2, borrow) = borrowing_sub(a[2], b[2], borrow);
    let (r3, borrow) = borrowing_sub(a[3], b[3], borrow);
    ([r0, r1, r2, r3], borrow)
}

/// `true` iff `limbs < modulus`.
#[inline]
pub(crate) const fn is_canonical(limbs: Limbs, modulus: Limbs) -> bool {
    let (_, borrow) = sub_limbs(limbs, modulus);
    borrow
}

/// Add two reduced values mod `modulus`.
#[inline]
pub(crate) const fn add_mod(a: Limbs, b: Limbs, modulus: Limbs) -> Limbs {
    let (r0, carry) = a[0].overflowing_add(b[0]);
    let (r1, carry) = carrying_add(a[1], b[1], carry);
    let (r2, carry) = carrying_add(a[2], b[2], carry);
    let (r3, carry) = carrying_add(a[3], b[3], carry);
    let sum = [r0, r1, r2, r3];

    let (reduced, borrow) = sub_limbs(sum, modulus);
    if carry || !borrow { reduced } else { sum }
}

/// Subtract two reduced values mod `modulus`.
#[inline]
pub(crate) const fn sub_mod(a: Limbs, b: Limbs, modulus: Limbs) -> Limbs {
    let (diff, borrow) = sub_limbs(a, b);
    if borrow {
        let (r0, carry) = diff[0].overflowing_add(modulus[0]);
        let (r1, carry) = carrying_add(diff[1], modulus[1], carry);
        let (r2, carry) = carrying_add(diff[2], modulus[2], carry);
        let (r3, _) = carrying_add(diff[3], modulus[3], carry);
        [r0, r1, r2, r3]
    } else {
        diff
    }
}

#[inline]
pub(crate) const fn neg_mod(a: Limbs, modulus: Limbs) -> Limbs {
    if a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0 {
        return [0, 0, 0, 0];
    }
    sub_mod(modulus, a, modulus)
}

/// Reduce a full 256-bit value that is known to be below `2 * modulus`.
#[inline]
pub(crate) const fn reduce_once(limbs: Limbs, modulus: Limbs) -> Limbs {
    let (reduced, borrow) = sub_limbs(limbs, modulus);
    if borrow { limbs } else { reduced }
}

/// Montgomery multiplication (CIOS): `a * b * 2^-256 mod modulus`.
///
/// `mu` is `-modulus^-1 mod 2^64`.
#[inline]
pub(crate) fn mont_mul(a: &Limbs, b: &Limbs, modulus: &Limbs, mu: u64) -> Limbs {
    let mut t = [0u64; 6];

    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let uv = (t[j] as u128) + (a[j] as u128) * (b[i] as u128) + carry;
            t[j] = uv as u64;
            carry = uv >> 64;
        }
        let uv = (t[4] as u128) + carry;
        t[4] = uv as u64;
        t[5] = (uv >> 64) as u64;

        let k = t[0].wrapping_mul(mu);
        let uv = (t[0] as u128) + (k as u128) * (modulus[0] as u128);
        let mut carry = uv >> 64;
        for j in 1..4 {
            let uv = (t[j] as u128) + (k as u128) * (modulus[j] as u128) + carry;
            t[j - 1] = uv as u64;
            carry = uv >> 64;
        }
        let uv = (t[4] as u128) + carry;
        t[3] = uv as u64;
        t[4] = t[5] + ((uv >> 64) as u64);
    }

    let result = [t[0], t[1], t[2], t[3]];
    let (reduced, borrow) = sub_limbs(result, *modulus);
    if t[4] != 0 || !borrow { reduced } else { result }
}

pub(crate) fn limbs_from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(word);
    }
    limbs
}

pub(crate) fn limbs_to_be_bytes(limbs: &Limbs) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().rev().enumerate() {
        out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
    }
    out
}

/// Generates the arithmetic surface of a Montgomery field type.
///
/// The type must be a struct with a single `limbs: [u64; 4]` field holding
/// the Montgomery form, and the invoking module must define `MODULUS`, `R`,
/// `R2` and `MU` for its modulus.
macro_rules! impl_montgomery_field {
    ($field:ident) => {
        impl $field {
            /// Zero element (in Montgomery form)
            pub const ZERO: Self = $field { limbs: [0, 0, 0, 0] };

            /// One element (in Montgomery form: R mod m)
            pub const ONE: Self = $field { limbs: R };

            /// Create a field element from a small canonical integer.
            #[inline]
            pub fn from_canonical_u64(val: u64) -> Self {
                Self::from_canonical_limbs([val, 0, 0, 0])
            }

            /// Convert canonical little-endian limbs (which must be `< MODULUS`)
            /// into Montgomery form.
            #[inline]
            pub fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
                $field {
                    limbs: $crate::montgomery::mont_mul(&limbs, &R2, &MODULUS, MU),
                }
            }

            /// Canonical little-endian limbs of this element.
            #[inline]
            pub fn to_canonical_limbs(&self) -> [u64; 4] {
                $crate::montgomery::mont_mul(&self.limbs, &[1, 0, 0, 0], &MODULUS, MU)
            }

            /// Parse a big-endian integer, rejecting anything `>= MODULUS`.
            pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
                let limbs = $crate::montgomery::limbs_from_be_bytes(bytes);
                if $crate::montgomery::is_canonical(limbs, MODULUS) {
                    Some(Self::from_canonical_limbs(limbs))
                } else {
                    None
                }
            }

            /// Parse a big-endian integer and reduce it mod `MODULUS`.
            ///
            /// Only meant for hash outputs and digests; inputs that encode
            /// protocol values go through [`Self::from_be_bytes`].
            pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
                let limbs = $crate::montgomery::limbs_from_be_bytes(bytes);
                Self::from_canonical_limbs($crate::montgomery::reduce_once(limbs, MODULUS))
            }

            /// Big-endian encoding of the canonical value.
            pub fn to_be_bytes(&self) -> [u8; 32] {
                $crate::montgomery::limbs_to_be_bytes(&self.to_canonical_limbs())
            }

            /// Check if this field element is zero
            #[inline]
            pub fn is_zero(&self) -> bool {
                self.limbs == [0, 0, 0, 0]
            }

            /// Parity of the canonical value.
            #[inline]
            pub fn is_odd(&self) -> bool {
                self.to_canonical_limbs()[0] & 1 == 1
            }

            #[inline]
            pub fn square(&self) -> Self {
                *self * *self
            }

            /// Variable-time exponentiation by a canonical exponent.
            pub fn pow_vartime(&self, exp: [u64; 4]) -> Self {
                let mut result = Self::ONE;
                let mut base = *self;

                for &limb in exp.iter() {
                    let mut remaining = limb;
                    for _ in 0..64 {
                        if remaining & 1 == 1 {
                            result *= base;
                        }
                        base = base.square();
                        remaining >>= 1;
                    }
                }

                result
            }

            /// Multiplicative inverse via Fermat's little theorem. Zero maps to zero.
            pub fn inverse(&self) -> Self {
                if self.is_zero() {
                    return Self::ZERO;
                }
                let exp = $crate::montgomery::sub_mod(MODULUS, [2, 0, 0, 0], MODULUS);
                self.pow_vartime(exp)
            }

            pub fn try_inverse(&self) -> Option<Self> {
                if self.is_zero() { None } else { Some(self.inverse()) }
            }

            /// The field modulus.
            pub fn modulus() -> num_bigint::BigUint {
                num_bigint::BigUint::from_bytes_be(&$crate::montgomery::limbs_to_be_bytes(
                    &MODULUS,
                ))
            }

            pub fn to_biguint(&self) -> num_bigint::BigUint {
                num_bigint::BigUint::from_bytes_be(&self.to_be_bytes())
            }
        }

        impl core::ops::Add for $field {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                $field {
                    limbs: $crate::montgomery::add_mod(self.limbs, rhs.limbs, MODULUS),
                }
            }
        }

        impl core::ops::AddAssign for $field {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl core::ops::Sub for $field {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $field {
                    limbs: $crate::montgomery::sub_mod(self.limbs, rhs.limbs, MODULUS),
                }
            }
        }

        impl core::ops::SubAssign for $field {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl core::ops::Neg for $field {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                $field {
                    limbs: $crate::montgomery::neg_mod(self.limbs, MODULUS),
                }
            }
        }

        impl core::ops::Mul for $field {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                $field {
                    limbs: $crate::montgomery::mont_mul(&self.limbs, &rhs.limbs, &MODULUS, MU),
                }
            }
        }

        impl core::ops::MulAssign for $field {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        #[allow(clippy::suspicious_arithmetic_impl)]
        impl core::ops::Div for $field {
            type Output = Self;

            #[inline]
            fn div(self, rhs: Self) -> Self {
                self * rhs.inverse()
            }
        }

        impl core::ops::DivAssign for $field {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl core::iter::Sum for $field {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl core::iter::Product for $field {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, x| acc * x)
            }
        }

        impl core::hash::Hash for $field {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                self.limbs.hash(state);
            }
        }

        impl core::fmt::Display for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let canonical = self.to_canonical_limbs();
                write!(
                    f,
                    "0x{:016x}{:016x}{:016x}{:016x}",
                    canonical[3], canonical[2], canonical[1], canonical[0]
                )
            }
        }

        impl core::fmt::Debug for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($field), self)
            }
        }

        impl rand::distr::Distribution<$field> for rand::distr::StandardUniform {
            fn sample<RNG: rand::Rng + ?Sized>(&self, rng: &mut RNG) -> $field {
                loop {
                    let bytes: [u8; 32] = rng.random();
                    if let Some(value) = $field::from_be_bytes(&bytes) {
                        return value;
                    }
                }
            }
        }
    };
}

pub(crate) use impl_montgomery_field;
