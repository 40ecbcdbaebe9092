//! Object identifiers.
//!
//! An [`Oid`] stores its arcs as `u32` values inline for the common case of
//! up to 16 arcs. The BER content packs the first two arcs into one
//! subidentifier (`arc1 * 40 + arc2`) and writes every subidentifier in
//! base 128 with the high bit set on all but its last octet.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::ber::{ByteCursor, Decoder, Tag};
use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use crate::types::{Decode, Encode, primitive_len};

/// Build an [`Oid`] from literal arcs.
///
/// ```
/// use snacc_ber::oid;
///
/// let oid = oid!(1, 2, 840, 113549);
/// assert_eq!(oid.to_string(), "1.2.840.113549");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

/// Object identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create from an iterator of arcs. No validation is performed.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create from a slice of arcs. No validation is performed.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse dotted notation such as `"1.3.6.1"`.
    ///
    /// The result is validated with [`validate`](Self::validate).
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }
        let mut arcs = SmallVec::new();
        for part in s.split('.') {
            let arc = part
                .parse::<u32>()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }
        let oid = Self { arcs };
        oid.validate_kind()
            .map_err(|kind| Error::invalid_oid_with_input(kind, s))?;
        Ok(oid)
    }

    /// Check the arc constraints X.660 places on the first two arcs.
    ///
    /// At least two arcs are required, the first must be 0, 1 or 2, and
    /// under 0 or 1 the second must be below 40.
    pub fn validate(&self) -> Result<()> {
        self.validate_kind().map_err(Error::invalid_oid)
    }

    fn validate_kind(&self) -> std::result::Result<(), OidErrorKind> {
        match self.arcs[..] {
            [] => Err(OidErrorKind::Empty),
            [_] => Err(OidErrorKind::TooShort),
            [first, ..] if first > 2 => Err(OidErrorKind::InvalidFirstArc(first)),
            [first, second, ..] if first < 2 && second >= 40 => {
                Err(OidErrorKind::InvalidSecondArc { first, second })
            }
            _ => Ok(()),
        }
    }

    /// The arcs.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Returns true if there are no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Returns true if `prefix` is a prefix of this OID.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// BER content octets (no tag or length).
    ///
    /// The OID must pass [`validate`](Self::validate); arcs outside the
    /// packable range would otherwise encode as a different OID.
    pub fn to_ber_smallvec(&self) -> Result<SmallVec<[u8; 64]>> {
        self.validate()?;
        let mut out = SmallVec::new();
        push_subidentifier(
            &mut out,
            u64::from(self.arcs[0]) * 40 + u64::from(self.arcs[1]),
        );
        for &arc in &self.arcs[2..] {
            push_subidentifier(&mut out, u64::from(arc));
        }
        Ok(out)
    }

    /// Decode BER content octets (no tag or length).
    pub fn from_ber(content: &[u8]) -> Result<Self> {
        parse_content(content).map_err(|kind| Error::decode(0, kind))
    }
}

/// Append one subidentifier in base 128, most significant group first.
fn push_subidentifier(out: &mut SmallVec<[u8; 64]>, value: u64) {
    let groups = (64 - value.leading_zeros()).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let group = ((value >> (i * 7)) & 0x7F) as u8;
        out.push(if i == 0 { group } else { group | 0x80 });
    }
}

fn parse_content(content: &[u8]) -> std::result::Result<Oid, DecodeErrorKind> {
    if content.is_empty() {
        return Err(DecodeErrorKind::InvalidOidEncoding);
    }

    // The first subidentifier carries arc1 * 40 (at most 80) on top of arc2
    let first_limit = u64::from(u32::MAX) + 80;
    let mut arcs = SmallVec::new();
    let mut value: u64 = 0;
    let mut in_group = false;
    for &byte in content {
        if !in_group && byte == 0x80 {
            // Leading 0x80 pads a subidentifier with a zero group
            return Err(DecodeErrorKind::InvalidOidEncoding);
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        let limit = if arcs.is_empty() {
            first_limit
        } else {
            u64::from(u32::MAX)
        };
        if value > limit {
            return Err(DecodeErrorKind::SubidentifierOverflow);
        }
        if byte & 0x80 != 0 {
            in_group = true;
            continue;
        }
        if arcs.is_empty() {
            let first = (value / 40).min(2);
            arcs.push(first as u32);
            arcs.push((value - first * 40) as u32);
        } else {
            arcs.push(value as u32);
        }
        value = 0;
        in_group = false;
    }
    if in_group {
        return Err(DecodeErrorKind::InvalidOidEncoding);
    }
    Ok(Oid { arcs })
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::from_slice(&arcs)
    }
}

// Not a `BerType`: encoding fails on arcs that cannot be packed.
impl Encode for Oid {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        let content = self.to_ber_smallvec()?;
        let len = buf.push_bytes(&content);
        Ok(len + buf.push_header(Tag::OBJECT_IDENTIFIER, len))
    }
}

impl Decode for Oid {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let tag = dec.expect_tag(Tag::OBJECT_IDENTIFIER)?;
        let len = dec.read_length()?;
        let len = primitive_len(dec, tag, len)?;
        let offset = dec.offset();
        let content = dec.take_bytes(len)?;
        parse_content(content).map_err(|kind| Error::decode(offset, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_util::{decode, encode};

    #[test]
    fn test_oid_macro_and_display() {
        let oid = oid!(1, 3, 6, 1, 2, 1);
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1");
        assert_eq!(format!("{:?}", oid), "Oid(1.3.6.1.2.1)");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Oid::parse("1.2.840").unwrap(), oid!(1, 2, 840));
        assert_eq!("2.999.1".parse::<Oid>().unwrap(), oid!(2, 999, 1));
    }

    #[test]
    fn test_parse_errors() {
        let kind = |s: &str| match Oid::parse(s).unwrap_err() {
            Error::InvalidOid { kind, .. } => kind,
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(kind(""), OidErrorKind::Empty);
        assert_eq!(kind("1..2"), OidErrorKind::InvalidArc);
        assert_eq!(kind("1.x"), OidErrorKind::InvalidArc);
        assert_eq!(kind("1.99999999999"), OidErrorKind::InvalidArc);
        assert_eq!(kind("1"), OidErrorKind::TooShort);
        assert_eq!(kind("3.1"), OidErrorKind::InvalidFirstArc(3));
        assert_eq!(
            kind("1.40"),
            OidErrorKind::InvalidSecondArc {
                first: 1,
                second: 40
            }
        );
    }

    #[test]
    fn test_parse_keeps_input() {
        match Oid::parse("0.50").unwrap_err() {
            Error::InvalidOid { input, .. } => assert_eq!(input.as_deref(), Some("0.50")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_starts_with() {
        let oid = oid!(1, 3, 6, 1, 4, 1);
        assert!(oid.starts_with(&oid!(1, 3, 6)));
        assert!(!oid.starts_with(&oid!(1, 3, 7)));
        assert!(oid.starts_with(&Oid::default()));
    }

    #[test]
    fn test_content_encoding() {
        assert_eq!(oid!(1, 3, 6, 1).to_ber_smallvec().unwrap().as_slice(), &[0x2B, 0x06, 0x01]);
        assert_eq!(
            oid!(1, 2, 840, 113549).to_ber_smallvec().unwrap().as_slice(),
            &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]
        );
        // 2.999 packs into a two-octet first subidentifier (1079)
        assert_eq!(oid!(2, 999).to_ber_smallvec().unwrap().as_slice(), &[0x88, 0x37]);
    }

    #[test]
    fn test_first_pair_split() {
        assert_eq!(Oid::from_ber(&[0x00]).unwrap(), oid!(0, 0));
        assert_eq!(Oid::from_ber(&[0x27]).unwrap(), oid!(0, 39));
        assert_eq!(Oid::from_ber(&[0x28]).unwrap(), oid!(1, 0));
        assert_eq!(Oid::from_ber(&[0x50]).unwrap(), oid!(2, 0));
        assert_eq!(Oid::from_ber(&[0x88, 0x37]).unwrap(), oid!(2, 999));
    }

    #[test]
    fn test_tlv_roundtrip() {
        for oid in [oid!(0, 1, 2, 3, 4, 5, 6), oid!(2, 38, 29, 40, 200, 10, 4000)] {
            let bytes = encode(&oid);
            assert_eq!(bytes[0], 0x06);
            assert_eq!(decode::<Oid>(&bytes).unwrap(), oid);
        }
        let bytes = encode(&oid!(2, 38, 29, 40, 200, 10, 4000));
        assert_eq!(
            bytes,
            vec![0x06, 0x08, 0x76, 0x1D, 0x28, 0x81, 0x48, 0x0A, 0x9F, 0x20]
        );
    }

    #[test]
    fn test_max_arc_roundtrip() {
        let oid = oid!(2, u32::MAX, u32::MAX);
        assert_eq!(Oid::from_ber(&oid.to_ber_smallvec().unwrap()).unwrap(), oid);
    }

    #[test]
    fn test_decode_errors() {
        let kind = |content: &[u8]| Oid::from_ber(content).unwrap_err().decode_kind();
        assert_eq!(kind(&[]), Some(DecodeErrorKind::InvalidOidEncoding));
        // trailing continuation bit
        assert_eq!(kind(&[0x2B, 0x86]), Some(DecodeErrorKind::InvalidOidEncoding));
        // padded subidentifier
        assert_eq!(kind(&[0x2B, 0x80, 0x01]), Some(DecodeErrorKind::InvalidOidEncoding));
        // 2^35 does not fit in an arc
        assert_eq!(
            kind(&[0x2B, 0x81, 0x80, 0x80, 0x80, 0x80, 0x00]),
            Some(DecodeErrorKind::SubidentifierOverflow)
        );
    }

    #[test]
    fn test_encode_rejects_unpackable_arcs() {
        let kind = |oid: Oid| {
            let mut buf = ByteCursor::for_write(16);
            let err = oid.encode(&mut buf).unwrap_err();
            assert!(buf.data().is_empty(), "bytes written for {oid}");
            match err {
                Error::InvalidOid { kind, .. } => kind,
                other => panic!("unexpected error: {other}"),
            }
        };
        assert_eq!(
            kind(oid!(1, 50)),
            OidErrorKind::InvalidSecondArc {
                first: 1,
                second: 50
            }
        );
        assert_eq!(kind(oid!(5, 3)), OidErrorKind::InvalidFirstArc(5));
        assert_eq!(kind(oid!(7)), OidErrorKind::TooShort);
        assert_eq!(kind(Oid::default()), OidErrorKind::Empty);
        // 2.x has no limit on the second arc
        assert_eq!(encode(&oid!(2, 50)), vec![0x06, 0x02, 0x81, 0x02]);
    }

    #[test]
    fn test_decode_constructed_rejected() {
        let err = decode::<Oid>(&[0x26, 0x01, 0x2B]).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::UnexpectedConstructed));
    }
}
