use crate::affine::Affine;
use crate::basefield::BaseField;
use crate::generator_table::mul_generator_projective;
use crate::{double_scalar_mul_basepoint_affine, Group, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Jacobian point on the elliptic curve.
/// Represents a point (X:Y:Z) with (x, y) = (X/Z^2, Y/Z^3).
/// The point at infinity is any point with Z = 0; the canonical one is (1:1:0).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Projective {
    pub x: BaseField,
    pub y: BaseField,
    pub z: BaseField,
}

impl Projective {
    /// The point at infinity (identity element): (1:1:0)
    pub const INFINITY: Self = Projective {
        x: BaseField::ONE,
        y: BaseField::ONE,
        z: BaseField::ZERO,
    };

    /// Create a new projective point.
    pub fn new(x: BaseField, y: BaseField, z: BaseField) -> Self {
        Projective { x, y, z }
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Convert to affine coordinates (one field inversion).
    pub fn to_affine(&self) -> Affine {
        if self.is_infinity() {
            return Affine::INFINITY;
        }

        let z_inv = self.z.inverse();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2 * z_inv;

        Affine::new(self.x * z_inv2, self.y * z_inv3)
    }

    /// Convert from affine coordinates.
    pub fn from_affine(point: &Affine) -> Self {
        if point.is_infinity() {
            return Self::INFINITY;
        }

        Projective::new(point.x, point.y, BaseField::ONE)
    }

    /// Check if a point is on the curve: Y^2 = X^3 + 7*Z^6.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }

        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        let rhs = self.x.square() * self.x + Affine::curve_b() * z6;

        self.y.square() == rhs
    }

    pub fn generator() -> Self {
        Self::from_affine(&Affine::generator())
    }

    /// Point doubling, "dbl-2009-l" (a = 0).
    pub fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let t = (self.x + b).square() - a - c;
        let d = t + t;
        let e = a + a + a;
        let f = e.square();

        let x3 = f - d - d;
        let c8 = {
            let c2 = c + c;
            let c4 = c2 + c2;
            c4 + c4
        };
        let y3 = e * (d - x3) - c8;
        let yz = self.y * self.z;
        let z3 = yz + yz;

        Projective::new(x3, y3, z3)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity() {
            return *self;
        }
        Projective::new(self.x, -self.y, self.z)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator_projective(scalar)
    }

    /// Compute a * G + b * P, where G is the fixed generator.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        let affine_point = point.to_affine();
        Projective::from_affine(&double_scalar_mul_basepoint_affine(a, b, &affine_point))
    }

    /// Convert several points to affine with a single shared inversion.
    pub fn batch_normalize(points: &[Self]) -> Vec<Affine> {
        // Montgomery's trick over the non-identity points.
        let mut prefix = Vec::with_capacity(points.len());
        let mut acc = BaseField::ONE;
        for p in points {
            prefix.push(acc);
            if !p.is_infinity() {
                acc *= p.z;
            }
        }

        let mut inv = acc.inverse();
        let mut out = vec![Affine::INFINITY; points.len()];
        for (i, p) in points.iter().enumerate().rev() {
            if p.is_infinity() {
                continue;
            }
            let z_inv = inv * prefix[i];
            inv *= p.z;
            let z_inv2 = z_inv.square();
            out[i] = Affine::new(p.x * z_inv2, p.y * z_inv2 * z_inv);
        }
        out
    }
}

impl PartialEq for Projective {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => true,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
            _ => false,
        }
    }
}

impl Eq for Projective {}

impl Group for Projective {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity()
    }

    #[inline]
    fn generator() -> Self {
        Projective::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Projective::mul_generator(scalar)
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

/// Point addition, "add-2007-bl".
impl Add for Projective {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity() {
            return other;
        }
        if other.is_infinity() {
            return self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * other.z * z2z2;
        let s2 = other.y * self.z * z1z1;

        let h = u2 - u1;
        let s_diff = s2 - s1;
        if h.is_zero() {
            return if s_diff.is_zero() {
                self.double()
            } else {
                Self::INFINITY
            };
        }

        let i = (h + h).square();
        let j = h * i;
        let r = s_diff + s_diff;
        let v = u1 * i;

        let x3 = r.square() - j - v - v;
        let s1j = s1 * j;
        let y3 = r * (v - x3) - s1j - s1j;
        let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;

        Projective::new(x3, y3, z3)
    }
}

impl AddAssign for Projective {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Projective {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Projective {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Projective {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul_windowed(&self, scalar)
    }
}

impl Mul<Projective> for ScalarField {
    type Output = Projective;

    fn mul(self, point: Projective) -> Projective {
        <Projective as Group>::scalar_mul_windowed(&point, &self)
    }
}

impl From<Affine> for Projective {
    fn from(point: Affine) -> Self {
        Projective::from_affine(&point)
    }
}

impl From<&Affine> for Projective {
    fn from(point: &Affine) -> Self {
        Projective::from_affine(point)
    }
}

impl From<Projective> for Affine {
    fn from(point: Projective) -> Self {
        point.to_affine()
    }
}

impl From<&Projective> for Affine {
    fn from(point: &Projective) -> Self {
        point.to_affine()
    }
}
