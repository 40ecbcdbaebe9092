//! BER codec runtime for ASN.1 types.
//!
//! `snacc-ber` is the runtime library that generated ASN.1 code builds on.
//! It provides:
//!
//! - A fixed-size [`ByteCursor`] that encodes backwards and decodes forwards,
//!   with sticky overflow and underflow flags
//! - Identifier and length octet codecs, including indefinite lengths
//! - Codecs for BOOLEAN, INTEGER, REAL, NULL, OCTET STRING, BIT STRING and
//!   OBJECT IDENTIFIER
//! - `ANY` / `ANY DEFINED BY` support through an [`AnyRegistry`] of
//!   prototypes selected by an integer or OID discriminator
//! - [`encode_pdu`] / [`decode_pdu`] entry points that turn cursor state into
//!   a single [`Result`]
//!
//! # Quick start
//!
//! ```
//! use snacc_ber::{BitString, decode_pdu, encode_pdu};
//!
//! let mut bits = BitString::new(10);
//! for i in (0..10).step_by(2) {
//!     bits.set_bit(i);
//! }
//!
//! let bytes = encode_pdu(&bits).unwrap();
//! assert_eq!(&bytes[..], &[0x03, 0x03, 0x06, 0xAA, 0x80]);
//!
//! let (decoded, consumed) = decode_pdu::<BitString>(&bytes).unwrap();
//! assert_eq!(decoded, bits);
//! assert_eq!(consumed, 5);
//! ```
//!
//! # Structured types
//!
//! SEQUENCEs are written by implementing [`Encode`] and [`Decode`] by hand
//! (or by generating those impls). Because the cursor writes backwards,
//! fields are encoded last to first:
//!
//! ```
//! use snacc_ber::{ByteCursor, Decode, Decoder, Encode, Result, Tag};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl Encode for Point {
//!     fn encode(&self, buf: &mut ByteCursor) -> Result<usize> {
//!         buf.push_sequence(|buf| Ok(self.y.encode(buf)? + self.x.encode(buf)?))
//!     }
//! }
//!
//! impl Decode for Point {
//!     fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
//!         dec.expect_tag(Tag::SEQUENCE)?;
//!         let len = dec.read_length()?;
//!         dec.constructed(len, |dec| {
//!             Ok(Point {
//!                 x: i64::decode(dec)?,
//!                 y: i64::decode(dec)?,
//!             })
//!         })
//!     }
//! }
//!
//! let bytes = snacc_ber::encode_pdu(&Point { x: 1, y: -1 }).unwrap();
//! assert_eq!(&bytes[..], &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0xFF]);
//! let (point, _) = snacc_ber::decode_pdu::<Point>(&bytes).unwrap();
//! assert_eq!(point, Point { x: 1, y: -1 });
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events under the `ber.*` field namespace.
//! Malformed end-of-contents octets and duplicate registry entries are
//! logged at `warn`; registrations and failed PDUs at `debug`; completed
//! PDUs and `ANY` binding at `trace`.

pub mod any;
pub mod ber;
pub mod codec;
pub mod error;
pub mod oid;
pub mod prelude;
pub mod types;

pub use any::{AnyInfo, AnyRegistry, AnyState, AnyType, AnyValue, Discriminator};
pub use ber::{ByteCursor, Class, Decoder, Length, Tag};
pub use codec::{Codec, CodecConfig, decode_pdu, encode_pdu};
pub use error::{DecodeErrorKind, EncodeErrorKind, Error, OidErrorKind, Result};
pub use oid::Oid;
pub use types::{BerType, BitString, Captured, Decode, Encode, Null, OctetString};
