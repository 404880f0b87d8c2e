//! Elliptic curve group secp256k1.
//!
//! This crate provides affine and Jacobian curve points, the base and scalar
//! fields, SEC1/x-only point encodings with lift-x reconstruction, and helpers
//! for random sampling. Field inputs that exceed their modulus are rejected
//! at the byte boundary rather than reduced.

mod montgomery;

mod affine;
mod basefield;
mod encoding;
mod generator_table;
mod group;
mod msm;
mod projective;
mod random;
mod scalarfield;

pub use affine::Affine;
pub use basefield::BaseField;
pub use encoding::{
    decode_compressed, decode_point, decode_x_only, lift_x, DecodeError, Parity, COMPRESSED_LEN,
    X_ONLY_LEN,
};
pub use generator_table::mul_generator_affine;
pub use group::{Group, ScalarBits};
pub use msm::double_scalar_mul_basepoint_affine;
pub use projective::Projective;
pub use random::RandomField;
pub use scalarfield::ScalarField;
