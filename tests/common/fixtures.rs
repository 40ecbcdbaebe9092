//! Common test fixtures: a small schema using `ANY DEFINED BY`.
//!
//! ```text
//! Attribute ::= SEQUENCE {
//!     id     INTEGER,
//!     value  ANY DEFINED BY id
//! }
//!
//! OidAttribute ::= SEQUENCE {
//!     type   OBJECT IDENTIFIER,
//!     value  ANY DEFINED BY type
//! }
//!
//! Record ::= SEQUENCE OF Attribute
//! ```

use snacc_ber::{
    AnyRegistry, AnyValue, BitString, ByteCursor, Decode, Decoder, Discriminator, Encode,
    OctetString, Oid, Result, Tag, oid,
};

// =============================================================================
// Discriminators
// =============================================================================

/// Integer discriminators registered by [`registry`].
pub mod ids {
    pub const INTEGER: i64 = 1;
    pub const BOOLEAN: i64 = 2;
    pub const OCTET_STRING: i64 = 3;
    pub const BIT_STRING: i64 = 4;
    pub const REAL: i64 = 5;
}

/// OID discriminators registered by [`registry`]: 1.2.3.{1..5}, plus 1.2.3
/// itself for an INTEGER.
pub fn type_oid(id: i64) -> Oid {
    oid!(1, 2, 3, id as u32)
}

/// Registry with every primitive under both an integer and an OID.
pub fn registry() -> AnyRegistry {
    let registry = AnyRegistry::new();
    registry.register_by_int(1, ids::INTEGER, 0i64);
    registry.register_by_int(2, ids::BOOLEAN, false);
    registry.register_by_int(3, ids::OCTET_STRING, OctetString::default());
    registry.register_by_int(4, ids::BIT_STRING, BitString::default());
    registry.register_by_int(5, ids::REAL, 0f64);

    registry.register_by_oid(11, type_oid(ids::INTEGER), 0i64);
    registry.register_by_oid(12, type_oid(ids::BOOLEAN), false);
    registry.register_by_oid(13, type_oid(ids::OCTET_STRING), OctetString::default());
    registry.register_by_oid(14, type_oid(ids::BIT_STRING), BitString::default());
    registry.register_by_oid(15, type_oid(ids::REAL), 0f64);
    registry.register_by_oid(10, oid!(1, 2, 3), 0i64);
    registry
}

// =============================================================================
// Schema types
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: i64,
    pub value: AnyValue,
}

impl Attribute {
    /// Build an attribute bound through `registry`.
    pub fn new<T: snacc_ber::AnyType>(registry: &AnyRegistry, id: i64, value: T) -> Self {
        let info = registry.resolve_by_int(id).expect("id registered");
        Self {
            id,
            value: AnyValue::with_value(info, value).expect("value matches prototype"),
        }
    }
}

impl Encode for Attribute {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        buf.push_sequence(|buf| Ok(self.value.encode(buf)? + self.id.encode(buf)?))
    }
}

impl Decode for Attribute {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.expect_tag(Tag::SEQUENCE)?;
        let len = dec.read_length()?;
        dec.constructed(len, |dec| {
            let id = i64::decode(dec)?;
            let value = AnyValue::decode_defined_by(dec, &Discriminator::Int(id))?;
            Ok(Self { id, value })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OidAttribute {
    pub oid: Oid,
    pub value: AnyValue,
}

impl OidAttribute {
    /// Build an attribute bound through `registry`.
    pub fn new<T: snacc_ber::AnyType>(registry: &AnyRegistry, oid: Oid, value: T) -> Self {
        let info = registry.resolve_by_oid(&oid).expect("OID registered");
        Self {
            oid,
            value: AnyValue::with_value(info, value).expect("value matches prototype"),
        }
    }
}

impl Encode for OidAttribute {
    fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
        buf.push_sequence(|buf| Ok(self.value.encode(buf)? + self.oid.encode(buf)?))
    }
}

impl Decode for OidAttribute {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        dec.expect_tag(Tag::SEQUENCE)?;
        let len = dec.read_length()?;
        dec.constructed(len, |dec| {
            let oid = Oid::decode(dec)?;
            let mut value = AnyValue::new();
            value.set_type_by_oid(dec.registry(), &oid)?;
            value.decode(dec)?;
            Ok(Self { oid, value })
        })
    }
}

// =============================================================================
// Values
// =============================================================================

/// `n` bits with every even-numbered bit set: 1010...
pub fn alternating_bits(n: usize) -> BitString {
    let mut bits = BitString::new(n);
    for i in (0..n).step_by(2) {
        bits.set_bit(i);
    }
    bits
}

/// The end-to-end record: -99, true, "Hi Mom", 1010101010, 108.3838.
pub fn sample_record(registry: &AnyRegistry) -> Vec<Attribute> {
    vec![
        Attribute::new(registry, ids::INTEGER, -99i64),
        Attribute::new(registry, ids::BOOLEAN, true),
        Attribute::new(registry, ids::OCTET_STRING, OctetString::from("Hi Mom")),
        Attribute::new(registry, ids::BIT_STRING, alternating_bits(10)),
        Attribute::new(registry, ids::REAL, 108.3838f64),
    ]
}

/// Wire bytes of [`sample_record`], checked by hand.
pub fn sample_record_bytes() -> Vec<u8> {
    let mut attributes: Vec<Vec<u8>> = vec![
        vec![0x02, 0x01, 0x01, 0x02, 0x01, 0x9D],
        vec![0x02, 0x01, 0x02, 0x01, 0x01, 0xFF],
        vec![0x02, 0x01, 0x03, 0x04, 0x06, b'H', b'i', b' ', b'M', b'o', b'm'],
        vec![0x02, 0x01, 0x04, 0x03, 0x03, 0x06, 0xAA, 0x80],
    ];
    let mut real = vec![0x02, 0x01, 0x05];
    real.extend_from_slice(&real_tlv(108.3838));
    attributes.push(real);

    let mut content = Vec::new();
    for attribute in attributes {
        content.push(0x30);
        content.push(attribute.len() as u8);
        content.extend_from_slice(&attribute);
    }
    let mut out = vec![0x30, content.len() as u8];
    out.extend_from_slice(&content);
    out
}

/// Canonical REAL TLV built from the IEEE 754 fields.
pub fn real_tlv(value: f64) -> Vec<u8> {
    let bits = value.to_bits();
    let mut mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let mut exponent = ((bits >> 52) & 0x7FF) as i64 - 1075;
    while mantissa & 1 == 0 {
        mantissa >>= 1;
        exponent += 1;
    }
    let exp_bytes: Vec<u8> = if (-128..128).contains(&exponent) {
        vec![exponent as i8 as u8]
    } else {
        (exponent as i16).to_be_bytes().to_vec()
    };
    let man_bytes: Vec<u8> = mantissa
        .to_be_bytes()
        .into_iter()
        .skip_while(|&b| b == 0)
        .collect();

    let mut content = vec![0x80 | (exp_bytes.len() as u8 - 1)];
    if value < 0.0 {
        content[0] |= 0x40;
    }
    content.extend_from_slice(&exp_bytes);
    content.extend_from_slice(&man_bytes);

    let mut out = vec![0x09, content.len() as u8];
    out.extend_from_slice(&content);
    out
}
