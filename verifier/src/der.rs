//! Minimal strict DER codec for `SEQUENCE { INTEGER r, INTEGER s }`.
//!
//! Only short-form lengths occur in a secp256k1 signature, so long-form
//! lengths are rejected along with negative or non-minimal integers and
//! trailing bytes.

use crate::constants::{DER_MAX_SIZE, DER_MIN_SIZE};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DerError {
    #[error("signature length {0} outside the DER envelope")]
    InvalidLength(usize),

    #[error("expected tag 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedTag { expected: u8, found: u8 },

    #[error("length field does not match the encoded content")]
    LengthMismatch,

    #[error("integer is negative")]
    NegativeInteger,

    #[error("integer is not minimally encoded")]
    NonMinimalInteger,

    #[error("integer is wider than 32 bytes")]
    IntegerTooLarge,

    #[error("trailing bytes after the signature")]
    TrailingData,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, DerError> {
        let b = *self.bytes.get(self.pos).ok_or(DerError::LengthMismatch)?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DerError> {
        let end = self.pos.checked_add(len).ok_or(DerError::LengthMismatch)?;
        let slice = self.bytes.get(self.pos..end).ok_or(DerError::LengthMismatch)?;
        self.pos = end;
        Ok(slice)
    }

    fn expect_tag(&mut self, expected: u8) -> Result<(), DerError> {
        let found = self.byte()?;
        if found != expected {
            return Err(DerError::UnexpectedTag { expected, found });
        }
        Ok(())
    }

    fn length(&mut self) -> Result<usize, DerError> {
        let len = self.byte()?;
        if len & 0x80 != 0 {
            return Err(DerError::LengthMismatch);
        }
        Ok(len as usize)
    }

    fn integer(&mut self) -> Result<[u8; 32], DerError> {
        self.expect_tag(TAG_INTEGER)?;
        let len = self.length()?;
        if len == 0 {
            return Err(DerError::LengthMismatch);
        }
        let content = self.take(len)?;

        if content[0] & 0x80 != 0 {
            return Err(DerError::NegativeInteger);
        }
        if content.len() > 1 && content[0] == 0 && content[1] & 0x80 == 0 {
            return Err(DerError::NonMinimalInteger);
        }

        let magnitude = if content[0] == 0 && content.len() > 1 {
            &content[1..]
        } else {
            content
        };
        if magnitude.len() > 32 {
            return Err(DerError::IntegerTooLarge);
        }

        let mut out = [0u8; 32];
        out[32 - magnitude.len()..].copy_from_slice(magnitude);
        Ok(out)
    }
}

/// Parse a DER `(r, s)` pair into two left-padded 32-byte big-endian integers.
pub fn parse_integer_pair(bytes: &[u8]) -> Result<([u8; 32], [u8; 32]), DerError> {
    if !(DER_MIN_SIZE..=DER_MAX_SIZE).contains(&bytes.len()) {
        return Err(DerError::InvalidLength(bytes.len()));
    }

    let mut reader = Reader::new(bytes);
    reader.expect_tag(TAG_SEQUENCE)?;
    let body_len = reader.length()?;
    if body_len != bytes.len() - 2 {
        return Err(DerError::LengthMismatch);
    }

    let r = reader.integer()?;
    let s = reader.integer()?;

    if reader.pos != bytes.len() {
        return Err(DerError::TrailingData);
    }
    Ok((r, s))
}

fn push_integer(out: &mut Vec<u8>, value: &[u8; 32]) {
    let first = value.iter().position(|&b| b != 0).unwrap_or(31);
    let magnitude = &value[first..];
    let pad = magnitude[0] & 0x80 != 0;

    out.push(TAG_INTEGER);
    out.push((magnitude.len() + pad as usize) as u8);
    if pad {
        out.push(0);
    }
    out.extend_from_slice(magnitude);
}

/// Encode two big-endian integers as a DER `(r, s)` sequence.
pub fn encode_integer_pair(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let mut body = Vec::with_capacity(DER_MAX_SIZE - 2);
    push_integer(&mut body, r);
    push_integer(&mut body, s);

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(TAG_SEQUENCE);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(v: u8) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[31] = v;
        out
    }

    #[test]
    fn test_minimal_encoding() {
        let der = encode_integer_pair(&small(1), &small(0x80));
        assert_eq!(der, [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
        assert_eq!(parse_integer_pair(&der), Ok((small(1), small(0x80))));
    }

    #[test]
    fn test_full_width_integers() {
        let r = [0xffu8; 32];
        let s = [0x7fu8; 32];
        let der = encode_integer_pair(&r, &s);
        assert_eq!(der.len(), 2 + (2 + 33) + (2 + 32));
        assert_eq!(parse_integer_pair(&der), Ok((r, s)));
    }

    #[test]
    fn test_rejects_envelope() {
        assert_eq!(parse_integer_pair(&[0x30; 7]), Err(DerError::InvalidLength(7)));
        assert_eq!(parse_integer_pair(&[0x30; 73]), Err(DerError::InvalidLength(73)));
    }

    #[test]
    fn test_rejects_wrong_tags() {
        let mut der = encode_integer_pair(&small(1), &small(2));
        der[0] = 0x31;
        assert_eq!(
            parse_integer_pair(&der),
            Err(DerError::UnexpectedTag { expected: 0x30, found: 0x31 })
        );
    }

    #[test]
    fn test_rejects_negative_and_non_minimal() {
        let negative = [0x30, 0x06, 0x02, 0x01, 0x81, 0x02, 0x01, 0x01];
        assert_eq!(parse_integer_pair(&negative), Err(DerError::NegativeInteger));

        let padded = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert_eq!(parse_integer_pair(&padded), Err(DerError::NonMinimalInteger));
    }

    #[test]
    fn test_rejects_length_mismatch_and_trailing() {
        let mut der = encode_integer_pair(&small(1), &small(2));
        der[1] += 1;
        assert_eq!(parse_integer_pair(&der), Err(DerError::LengthMismatch));

        // Sequence length covers a stray byte after s.
        let trailing = [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x00];
        assert_eq!(parse_integer_pair(&trailing), Err(DerError::TrailingData));
    }

    #[test]
    fn test_rejects_oversized_integer() {
        let mut der = vec![0x30, 0x26, 0x02, 0x21];
        der.extend_from_slice(&[0x01; 33]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert_eq!(parse_integer_pair(&der), Err(DerError::IntegerTooLarge));
    }
}
