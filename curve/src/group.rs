use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Access to the canonical little-endian bits of a scalar.
pub trait ScalarBits {
    fn to_u64_limbs(&self) -> [u64; 4];
}

/// Additive group of curve points.
///
/// Every operation must accept the identity and the zero scalar without
/// panicking; both simply yield the identity.
pub trait Group:
    Sized + Copy + Add<Output = Self> + AddAssign + Sub<Output = Self> + SubAssign + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn mul_generator(scalar: &Self::Scalar) -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    /// Left-to-right double-and-add.
    #[inline]
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let scalar_limbs = scalar.to_u64_limbs();
        let mut result = Self::identity();

        for &limb in scalar_limbs.iter().rev() {
            for shift in (0..64).rev() {
                result = result.double();
                if (limb >> shift) & 1 == 1 {
                    result += *self;
                }
            }
        }

        result
    }

    /// Fixed 4-bit window multiplication.
    fn scalar_mul_windowed(&self, scalar: &Self::Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let table = window_table(self);
        let scalar_limbs = scalar.to_u64_limbs();
        let mut result = Self::identity();

        for &limb in scalar_limbs.iter().rev() {
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

    fn mul_u64(&self, n: u64) -> Self {
        match n {
            0 => Self::identity(),
            1 => *self,
            _ => {
                let mut result = Self::identity();
                let mut temp = *self;
                let mut bits = n;

                while bits > 0 {
                    if bits & 1 == 1 {
                        result += temp;
                    }
                    temp = temp.double();
                    bits >>= 1;
                }

                result
            }
        }
    }

    /// Sum of `scalars[i] * points[i]`. Extra entries in the longer slice are ignored.
    fn multi_scalar_mul(points: &[Self], scalars: &[Self::Scalar]) -> Self {
        debug_assert_eq!(
            points.len(),
            scalars.len(),
            "Points and scalars must have same length"
        );

        points
            .iter()
            .zip(scalars.iter())
            .fold(Self::identity(), |acc, (point, scalar)| {
                acc + point.scalar_mul_windowed(scalar)
            })
    }
}

/// `[O, P, 2P, ..., 15P]`
pub(crate) fn window_table<G: Group>(point: &G) -> [G; 16] {
    let mut table = [G::identity(); 16];
    table[1] = *point;
    for i in 2..16 {
        table[i] = if i % 2 == 0 {
            table[i / 2].double()
        } else {
            table[i - 1] + table[1]
        };
    }
    table
}
