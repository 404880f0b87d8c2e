use crate::generator_table::generator_table;
use crate::group::{window_table, ScalarBits};
use crate::{Affine, Projective, ScalarField};

/// Compute a * G + b * P with interleaved 4-bit windows over a shared doubling chain.
pub fn double_scalar_mul_basepoint_affine(
    a: &ScalarField,
    b: &ScalarField,
    point: &Affine,
) -> Affine {
    let base_table = generator_table();
    let point_table = window_table(&Projective::from_affine(point));

    let a_limbs = a.to_u64_limbs();
    let b_limbs = b.to_u64_limbs();
    let mut result = Projective::INFINITY;

    for limb_idx in (0..4).rev() {
        let a_limb = a_limbs[limb_idx];
        let b_limb = b_limbs[limb_idx];
        for shift in (0..64).step_by(4).rev() {
            result = result.double().double().double().double();

            let a_window = ((a_limb >> shift) & 0xF) as usize;
            if a_window != 0 {
                result += base_table[a_window];
            }

            let b_window = ((b_limb >> shift) & 0xF) as usize;
            if b_window != 0 {
                result += point_table[b_window];
            }
        }
    }

    result.to_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn test_matches_separate_multiplications() {
        let p = Affine::generator().mul_u64(31337);
        let a = ScalarField::from_canonical_u64(0xfeed_face);
        let b = -ScalarField::from_canonical_u64(0xc0ffee);

        let combined = double_scalar_mul_basepoint_affine(&a, &b, &p);
        let expected = Affine::mul_generator(&a) + p.scalar_mul(&b);
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_cancellation_gives_identity() {
        // s*G - s*G with P = G
        let g = Affine::generator();
        let s = ScalarField::from_canonical_u64(42);
        let result = double_scalar_mul_basepoint_affine(&s, &-s, &g);
        assert!(result.is_infinity());
    }

    #[test]
    fn test_zero_scalars_and_identity_point() {
        let g = Affine::generator();
        let zero = ScalarField::ZERO;
        assert!(double_scalar_mul_basepoint_affine(&zero, &zero, &g).is_infinity());

        let a = ScalarField::from_canonical_u64(3);
        assert_eq!(
            double_scalar_mul_basepoint_affine(&a, &a, &Affine::INFINITY),
            g.mul_u64(3)
        );
    }
}
