// secp256k1 : y^2 = x^3 + 7 over GF(p), p = 2^256 - 2^32 - 977
// Generator (SEC 2, section 2.4.1):
//   x = 0x79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798
//   y = 0x483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8
// Curve prime order: 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
// Curve cofactor: 1

use crate::basefield::BaseField;
use crate::{double_scalar_mul_basepoint_affine, mul_generator_affine, Group, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

const GENERATOR_X: [u64; 4] = [
    0x59f2815b16f81798,
    0x029bfcdb2dce28d9,
    0x55a06295ce870b07,
    0x79be667ef9dcbbac,
];

const GENERATOR_Y: [u64; 4] = [
    0x9c47d08ffb10d4b8,
    0xfd17b448a6855419,
    0x5da4fbfc0e1108a8,
    0x483ada7726a3c465,
];

/// Affine point on the elliptic curve.
/// Represents a point in affine coordinates (x, y) or the point at infinity.
#[derive(Copy, Clone, Debug, Eq, Serialize, Deserialize)]
pub struct Affine {
    /// The x-coordinate of the point
    pub x: BaseField,
    /// The y-coordinate of the point
    pub y: BaseField,
    /// Whether this point is the point at infinity (identity element)
    pub is_infinity: bool,
}

impl Affine {
    /// The 'b' coefficient of y^2 = x^3 + b.
    #[inline]
    pub(crate) fn curve_b() -> BaseField {
        BaseField::from_canonical_u64(7)
    }

    /// The point at infinity (identity element)
    pub const INFINITY: Self = Affine {
        x: BaseField::ZERO,
        y: BaseField::ZERO,
        is_infinity: true,
    };

    /// Create a new affine point. No curve check is performed.
    pub fn new(x: BaseField, y: BaseField) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Check if a point is on the curve: y^2 = x^3 + 7.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }

        let rhs = self.x.square() * self.x + Self::curve_b();
        self.y.square() == rhs
    }

    /// The standard secp256k1 base point.
    pub fn generator() -> Self {
        Affine::new(
            BaseField::from_canonical_limbs(GENERATOR_X),
            BaseField::from_canonical_limbs(GENERATOR_Y),
        )
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        if self.is_infinity || self.y.is_zero() {
            return Self::INFINITY;
        }

        // λ = 3x^2 / 2y  (a = 0)
        let x2 = self.x.square();
        let numerator = x2 + x2 + x2;
        let denominator = self.y + self.y;
        let lambda = numerator / denominator;

        let x_r = lambda.square() - self.x - self.x;
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Affine::new(self.x, -self.y)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator_affine(scalar)
    }

    /// Compute a * G + b * P, where G is the fixed generator.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        double_scalar_mul_basepoint_affine(a, b, point)
    }
}

impl PartialEq for Affine {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_infinity, other.is_infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl Group for Affine {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity
    }

    #[inline]
    fn generator() -> Self {
        Affine::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Affine::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

impl Add for Affine {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity {
            return other;
        }
        if other.is_infinity {
            return self;
        }

        if self.x == other.x {
            return if self.y == other.y {
                self.double()
            } else {
                Self::INFINITY
            };
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = (other.y - self.y) / (other.x - self.x);

        let x_r = lambda.square() - self.x - other.x;
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }
}

impl AddAssign for Affine {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Affine {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Affine {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Affine {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, scalar)
    }
}

impl Mul<Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: Affine) -> Affine {
        <Affine as Group>::scalar_mul_windowed(&point, &self)
    }
}

impl Mul<&Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: &Affine) -> Affine {
        <Affine as Group>::scalar_mul_windowed(point, &self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    // 2G, from the SEC 2 test vectors.
    const TWO_G_X: [u8; 32] = [
        0xc6, 0x04, 0x7f, 0x94, 0x41, 0xed, 0x7d, 0x6d, 0x30, 0x45, 0x40, 0x6e, 0x95, 0xc0, 0x7c,
        0xd8, 0x5c, 0x77, 0x8e, 0x4b, 0x8c, 0xef, 0x3c, 0xa7, 0xab, 0xac, 0x09, 0xb9, 0x5c, 0x70,
        0x9e, 0xe5,
    ];

    #[test]
    fn test_infinity() {
        let inf = Affine::INFINITY;
        assert!(inf.is_infinity());
        assert!(inf.is_on_curve());
    }

    #[test]
    fn test_generator_on_curve() {
        let g = Affine::generator();
        assert!(g.is_on_curve(), "Generator point is not on the curve");
        assert!(!g.is_infinity());
    }

    #[test]
    fn test_point_addition_with_infinity() {
        let g = Affine::generator();
        let inf = Affine::INFINITY;

        assert_eq!(g + inf, g);
        assert_eq!(inf + g, g);
        assert_eq!(inf + inf, inf);
    }

    #[test]
    fn test_point_doubling() {
        let g = Affine::generator();
        let g2 = g.double();

        assert!(g2.is_on_curve(), "Doubled point is not on the curve");
        assert_eq!(g + g, g2);
        assert_eq!(g2.x.to_be_bytes(), TWO_G_X);
    }

    #[test]
    fn test_point_negation() {
        let g = Affine::generator();
        let neg_g = g.negate();

        assert!(neg_g.is_on_curve());
        assert_eq!(g + neg_g, Affine::INFINITY);
    }

    #[test]
    fn test_scalar_multiplication() {
        let g = Affine::generator();
        let scalar = ScalarField::from_canonical_u64(5);
        let result = g.scalar_mul(&scalar);

        let expected = g + g + g + g + g;
        assert_eq!(result, expected);
        assert!(result.is_on_curve());
    }

    #[test]
    fn test_scalar_mul_zero() {
        let g = Affine::generator();
        assert_eq!(g.scalar_mul(&ScalarField::ZERO), Affine::INFINITY);
        assert_eq!(g.scalar_mul_windowed(&ScalarField::ZERO), Affine::INFINITY);
        assert_eq!(
            Affine::INFINITY.scalar_mul(&ScalarField::from_canonical_u64(9)),
            Affine::INFINITY
        );
    }

    #[test]
    fn test_scalar_mul_order_is_identity() {
        // (n - 1) * G = -G, so adding G gives the identity.
        let g = Affine::generator();
        let n_minus_one = -ScalarField::ONE;
        assert_eq!(g * n_minus_one, -g);
        assert_eq!(g * n_minus_one + g, Affine::INFINITY);
    }

    #[test]
    fn test_associativity() {
        let g = Affine::generator();
        let a = ScalarField::from_canonical_u64(3);
        let b = ScalarField::from_canonical_u64(5);

        let left = g.scalar_mul(&(a + b));
        let right = g.scalar_mul(&a) + g.scalar_mul(&b);

        assert_eq!(left, right);
    }

    #[test]
    fn test_windowed_scalar_mul() {
        let g = Affine::generator();
        let scalar = ScalarField::from_canonical_u64(123456);

        let result1 = g.scalar_mul(&scalar);
        let result2 = g.scalar_mul_windowed(&scalar);

        assert_eq!(result1, result2);
        assert!(result1.is_on_curve());
    }

    #[test]
    fn test_mul_generator() {
        let scalar = ScalarField::from_canonical_u64(123456);
        let result = Affine::mul_generator(&scalar);
        let expected = Affine::generator().scalar_mul(&scalar);

        assert_eq!(result, expected);
        assert!(result.is_on_curve());
    }

    #[test]
    fn test_multi_scalar_mul() {
        let g = Affine::generator();
        let h = g.mul_u64(17);

        let a = ScalarField::from_canonical_u64(7);
        let b = ScalarField::from_canonical_u64(11);

        let result = <Affine as Group>::multi_scalar_mul(&[g, h], &[a, b]);
        // 7 + 11 * 17 = 194
        assert_eq!(result, g.mul_u64(194));
    }

    #[test]
    fn test_group_properties() {
        let g = Affine::generator();

        assert_eq!(g.double(), g + g);
        assert_eq!(g + g + g, g.mul_u64(3));

        let h = g.mul_u64(5);
        assert_eq!(h + (-h), Affine::INFINITY);
        assert_eq!(h - h, Affine::INFINITY);
    }
}
