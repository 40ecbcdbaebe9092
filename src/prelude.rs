//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use snacc_ber::prelude::*;
//!
//! let bytes = encode_pdu(&oid!(1, 2, 3)).unwrap();
//! let (oid, _) = decode_pdu::<Oid>(&bytes).unwrap();
//! assert_eq!(oid.to_string(), "1.2.3");
//! ```
//!
//! This imports:
//! - The codec traits: [`Encode`], [`Decode`], [`BerType`]
//! - Value types: [`OctetString`], [`BitString`], [`Null`], [`Oid`], [`AnyValue`]
//! - Entry points: [`Codec`], [`encode_pdu`], [`decode_pdu`], [`AnyRegistry`]
//! - Error handling: [`Error`], [`Result`]
//! - The [`oid!`] macro

pub use crate::any::{AnyRegistry, AnyValue};
pub use crate::ber::{ByteCursor, Decoder, Tag};
pub use crate::codec::{Codec, decode_pdu, encode_pdu};
pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::types::{BerType, BitString, Decode, Encode, Null, OctetString};

#[doc(no_inline)]
pub use crate::oid;
