//! BER (Basic Encoding Rules) buffer, tag and length layer.
//!
//! This module provides the byte-level machinery the value codecs build on:
//! a fixed-size [`ByteCursor`] written backwards and read forwards, the
//! identifier and length octet codecs, and the [`Decoder`] that frames
//! constructed content. The implementation follows X.690 with permissive
//! parsing of non-minimal encodings.

mod buf;
mod decode;
mod encode;
mod length;
pub mod tag;

pub use buf::ByteCursor;
pub use decode::{DEFAULT_MAX_DEPTH, Decoder};
pub use length::{
    INDEFINITE_OCTET, Length, decode_eoc, decode_length, encode_eoc, encode_indefinite_length,
    encode_length,
};
pub use tag::{Class, Tag, decode_tag, encode_tag};

pub(crate) use encode::{encode_integer_stack, encode_unsigned_stack};
