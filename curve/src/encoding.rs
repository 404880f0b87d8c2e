//! SEC1 compressed and BIP-340 x-only point encodings.
//!
//! Decoding never reduces: a coordinate `>= p` is rejected before any
//! square root is attempted.

use crate::{Affine, BaseField};

/// Length of a compressed SEC1 point.
pub const COMPRESSED_LEN: usize = 33;

/// Length of an x-only point.
pub const X_ONLY_LEN: usize = 32;

const PREFIX_EVEN: u8 = 0x02;
const PREFIX_ODD: u8 = 0x03;

/// Errors raised while turning bytes into a curve point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid point encoding length: {0} bytes")]
    InvalidLength(usize),

    #[error("invalid compressed point prefix 0x{0:02x}")]
    InvalidPrefix(u8),

    #[error("x-coordinate is not below the field modulus")]
    FieldOverflow,

    #[error("x-coordinate does not correspond to a curve point")]
    NotOnCurve,
}

/// Parity of the y-coordinate selected by `lift_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    fn of(y: &BaseField) -> Self {
        if y.is_odd() { Parity::Odd } else { Parity::Even }
    }

    fn prefix(self) -> u8 {
        match self {
            Parity::Even => PREFIX_EVEN,
            Parity::Odd => PREFIX_ODD,
        }
    }
}

impl From<bool> for Parity {
    fn from(odd: bool) -> Self {
        if odd { Parity::Odd } else { Parity::Even }
    }
}

/// Reconstruct the point with x-coordinate `x` whose y has the requested parity.
///
/// Solves `y^2 = x^3 + 7`, takes `y0 = (y^2)^((p+1)/4)` and returns `y0` or
/// `p - y0`.
pub fn lift_x(x: &BaseField, parity: Parity) -> Result<Affine, DecodeError> {
    let y2 = x.square() * *x + Affine::curve_b();
    let y0 = y2.sqrt().ok_or(DecodeError::NotOnCurve)?;
    let y = if Parity::of(&y0) == parity { y0 } else { -y0 };
    Ok(Affine::new(*x, y))
}

fn field_from_slice(bytes: &[u8]) -> Result<BaseField, DecodeError> {
    let array: &[u8; 32] = bytes
        .try_into()
        .map_err(|_| DecodeError::InvalidLength(bytes.len()))?;
    BaseField::from_be_bytes(array).ok_or(DecodeError::FieldOverflow)
}

/// Decode a 32-byte x-only key; y is taken to be even.
pub fn decode_x_only(bytes: &[u8]) -> Result<Affine, DecodeError> {
    if bytes.len() != X_ONLY_LEN {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }
    lift_x(&field_from_slice(bytes)?, Parity::Even)
}

/// Decode a strict 33-byte compressed point.
pub fn decode_compressed(bytes: &[u8]) -> Result<Affine, DecodeError> {
    if bytes.len() != COMPRESSED_LEN {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }
    let parity = match bytes[0] {
        PREFIX_EVEN => Parity::Even,
        PREFIX_ODD => Parity::Odd,
        other => return Err(DecodeError::InvalidPrefix(other)),
    };
    lift_x(&field_from_slice(&bytes[1..])?, parity)
}

/// Decode either a compressed (33-byte) or x-only (32-byte) point.
pub fn decode_point(bytes: &[u8]) -> Result<Affine, DecodeError> {
    match bytes.len() {
        COMPRESSED_LEN => decode_compressed(bytes),
        X_ONLY_LEN => decode_x_only(bytes),
        other => Err(DecodeError::InvalidLength(other)),
    }
}

impl Affine {
    /// The affine x-coordinate, `None` for the identity.
    pub fn x_coordinate(&self) -> Option<BaseField> {
        (!self.is_infinity()).then_some(self.x)
    }

    /// Compressed SEC1 encoding, `None` for the identity.
    pub fn to_compressed(&self) -> Option<[u8; COMPRESSED_LEN]> {
        let x = self.x_coordinate()?;
        let mut out = [0u8; COMPRESSED_LEN];
        out[0] = Parity::of(&self.y).prefix();
        out[1..].copy_from_slice(&x.to_be_bytes());
        Some(out)
    }

    /// BIP-340 x-only encoding, `None` for the identity.
    pub fn to_x_only(&self) -> Option<[u8; X_ONLY_LEN]> {
        self.x_coordinate().map(|x| x.to_be_bytes())
    }

    /// Whether the y-coordinate is even. The identity reports `false`.
    pub fn has_even_y(&self) -> bool {
        !self.is_infinity() && !self.y.is_odd()
    }
}
