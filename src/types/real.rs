//! REAL (UNIVERSAL 9), X.690 Section 8.5.
//!
//! Encoding produces the canonical binary form: base 2, scale factor 0, an
//! odd mantissa and the shortest two's-complement exponent. Zero has empty
//! content and the special values use one octet each.
//!
//! Decoding accepts every binary form (bases 2, 8 and 16, any scale factor,
//! all exponent length formats), the special values and the decimal
//! NR1/NR2/NR3 forms.

use super::{BerType, primitive_len};
use crate::ber::{ByteCursor, Decoder, Length, Tag, encode_integer_stack, encode_unsigned_stack};
use crate::error::{DecodeErrorKind, Error, Result};

/// Special value octets (X.690 8.5.9).
mod special {
    pub const PLUS_INFINITY: u8 = 0x40;
    pub const MINUS_INFINITY: u8 = 0x41;
    pub const NOT_A_NUMBER: u8 = 0x42;
    pub const MINUS_ZERO: u8 = 0x43;
}

/// First content octet bits for the binary form.
const BINARY: u8 = 0x80;
const SIGN: u8 = 0x40;

impl BerType for f64 {
    const TAG: Tag = Tag::REAL;

    fn encode_content(&self, buf: &mut ByteCursor) -> usize {
        let value = *self;
        let special = if value.is_nan() {
            special::NOT_A_NUMBER
        } else if value == f64::INFINITY {
            special::PLUS_INFINITY
        } else if value == f64::NEG_INFINITY {
            special::MINUS_INFINITY
        } else if value == 0.0 {
            if value.is_sign_negative() {
                special::MINUS_ZERO
            } else {
                return 0;
            }
        } else {
            let (mantissa, exponent) = binary_parts(value.abs());
            let (man, man_len) = encode_unsigned_stack(mantissa);
            let (exp, exp_len) = encode_integer_stack(exponent as i64);

            buf.push_bytes(&man[8 - man_len..]);
            buf.push_bytes(&exp[8 - exp_len..]);
            let mut first = BINARY | (exp_len as u8 - 1);
            if value.is_sign_negative() {
                first |= SIGN;
            }
            buf.put_byte_reverse(first);
            return 1 + exp_len + man_len;
        };
        buf.put_byte_reverse(special);
        1
    }

    fn decode_content(dec: &mut Decoder<'_>, tag: Tag, len: Length) -> Result<Self> {
        let len = primitive_len(dec, tag, len)?;
        let offset = dec.offset();
        let content = dec.take_bytes(len)?;
        parse_real(content).map_err(|kind| Error::decode(offset, kind))
    }
}

/// Split a positive finite value into an odd mantissa and a base-2 exponent.
fn binary_parts(value: f64) -> (u64, i32) {
    let bits = value.to_bits();
    let raw_exp = ((bits >> 52) & 0x7FF) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if raw_exp == 0 {
        // Subnormal
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), raw_exp - 1075)
    };
    let shift = mantissa.trailing_zeros();
    mantissa >>= shift;
    exponent += shift as i32;
    (mantissa, exponent)
}

/// Multiply by a power of two without overflowing intermediate powers.
fn scale_by_pow2(mut value: f64, mut exp: i64) -> f64 {
    const STEP: i32 = 1000;
    // Beyond these the result is already infinite or zero
    exp = exp.clamp(-2200, 2200);
    while exp > STEP as i64 {
        value *= 2f64.powi(STEP);
        exp -= STEP as i64;
    }
    while exp < -(STEP as i64) {
        value *= 2f64.powi(-STEP);
        exp += STEP as i64;
    }
    value * 2f64.powi(exp as i32)
}

fn parse_real(content: &[u8]) -> std::result::Result<f64, DecodeErrorKind> {
    let Some((&first, rest)) = content.split_first() else {
        return Ok(0.0);
    };

    if first & BINARY != 0 {
        return parse_binary(first, rest);
    }
    if first & SIGN != 0 {
        if !rest.is_empty() {
            return Err(DecodeErrorKind::InvalidReal);
        }
        return match first {
            special::PLUS_INFINITY => Ok(f64::INFINITY),
            special::MINUS_INFINITY => Ok(f64::NEG_INFINITY),
            special::NOT_A_NUMBER => Ok(f64::NAN),
            special::MINUS_ZERO => Ok(-0.0),
            _ => Err(DecodeErrorKind::InvalidReal),
        };
    }
    parse_decimal(first, rest)
}

fn parse_binary(first: u8, rest: &[u8]) -> std::result::Result<f64, DecodeErrorKind> {
    let log2_base: i64 = match (first >> 4) & 0x03 {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => return Err(DecodeErrorKind::InvalidReal),
    };
    let scale = ((first >> 2) & 0x03) as i64;

    let (exp_len, rest) = match first & 0x03 {
        n @ 0..=2 => (n as usize + 1, rest),
        _ => {
            let (&n, rest) = rest.split_first().ok_or(DecodeErrorKind::InvalidReal)?;
            (n as usize, rest)
        }
    };
    if exp_len == 0 || exp_len > 4 || rest.len() < exp_len {
        return Err(DecodeErrorKind::InvalidReal);
    }
    let (exp_bytes, mantissa_bytes) = rest.split_at(exp_len);

    let mut exponent = exp_bytes[0] as i8 as i64;
    for &b in &exp_bytes[1..] {
        exponent = (exponent << 8) | b as i64;
    }

    let mut mantissa = 0f64;
    for &b in mantissa_bytes {
        mantissa = mantissa * 256.0 + b as f64;
    }

    let value = scale_by_pow2(mantissa, exponent * log2_base + scale);
    Ok(if first & SIGN != 0 { -value } else { value })
}

fn parse_decimal(first: u8, rest: &[u8]) -> std::result::Result<f64, DecodeErrorKind> {
    // NR1, NR2, NR3 (ISO 6093)
    if !(1..=3).contains(&(first & 0x3F)) {
        return Err(DecodeErrorKind::InvalidReal);
    }
    // Only digits, sign, decimal mark, exponent marker and spaces
    if !rest
        .iter()
        .all(|b| b.is_ascii_digit() || b"+-.,Ee ".contains(b))
    {
        return Err(DecodeErrorKind::InvalidReal);
    }
    let text = std::str::from_utf8(rest).map_err(|_| DecodeErrorKind::InvalidReal)?;
    let text = text.trim_matches(' ').replace(',', ".");
    text.parse::<f64>().map_err(|_| DecodeErrorKind::InvalidReal)
}
