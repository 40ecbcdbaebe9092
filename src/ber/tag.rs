//! BER identifier octets.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for the high-tag-number form)
//!
//! In the high-tag-number form the number follows in base-128 octets,
//! most significant first, with bit 7 set on every octet but the last.

use super::ByteCursor;
use crate::error::{DecodeErrorKind, Error, Result};

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const PRIVATE: u8 = 0xC0;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Low five bits marking the high-tag-number form.
const HIGH_TAG_FORM: u8 = 0x1F;

/// Universal tag numbers (X.690 Section 8.4)
pub mod universal {
    pub const EOC: u32 = 0;
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const REAL: u32 = 9;
    pub const ENUMERATED: u32 = 10;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
}

/// Tag class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    /// Identifier octet bits for this class.
    pub const fn bits(self) -> u8 {
        match self {
            Class::Universal => class::UNIVERSAL,
            Class::Application => class::APPLICATION,
            Class::Context => class::CONTEXT_SPECIFIC,
            Class::Private => class::PRIVATE,
        }
    }

    /// Class from the top two bits of an identifier octet.
    pub const fn from_bits(octet: u8) -> Self {
        match octet & 0xC0 {
            class::UNIVERSAL => Class::Universal,
            class::APPLICATION => Class::Application,
            class::CONTEXT_SPECIFIC => Class::Context,
            _ => Class::Private,
        }
    }
}

/// A BER tag packed into one word.
///
/// The top byte holds the class and constructed bits exactly as they appear
/// in the first identifier octet; the low 28 bits hold the tag number. Tags
/// compare equal only if class, form and number all match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u32);

impl Tag {
    /// Largest tag number that fits in five identifier octets.
    pub const MAX_NUMBER: u32 = 0x0FFF_FFFF;

    /// End-of-contents marker tag (all zero).
    pub const EOC: Tag = Tag::universal(universal::EOC);
    pub const BOOLEAN: Tag = Tag::universal(universal::BOOLEAN);
    pub const INTEGER: Tag = Tag::universal(universal::INTEGER);
    pub const BIT_STRING: Tag = Tag::universal(universal::BIT_STRING);
    pub const OCTET_STRING: Tag = Tag::universal(universal::OCTET_STRING);
    pub const NULL: Tag = Tag::universal(universal::NULL);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(universal::OBJECT_IDENTIFIER);
    pub const REAL: Tag = Tag::universal(universal::REAL);
    pub const ENUMERATED: Tag = Tag::universal(universal::ENUMERATED);
    pub const SEQUENCE: Tag = Tag::universal(universal::SEQUENCE).into_constructed();
    pub const SET: Tag = Tag::universal(universal::SET).into_constructed();

    /// Create a tag.
    ///
    /// `number` must not exceed [`MAX_NUMBER`](Self::MAX_NUMBER). Debug builds
    /// assert this; release builds mask the high bits. Use
    /// [`try_new`](Self::try_new) for numbers that are not known to fit.
    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        debug_assert!(number <= Self::MAX_NUMBER, "tag number out of range");
        let mut high = class.bits() as u32;
        if constructed {
            high |= CONSTRUCTED as u32;
        }
        Tag((high << 24) | (number & Self::MAX_NUMBER))
    }

    /// Create a tag, or `None` if `number` exceeds [`MAX_NUMBER`](Self::MAX_NUMBER).
    pub const fn try_new(class: Class, constructed: bool, number: u32) -> Option<Self> {
        if number > Self::MAX_NUMBER {
            return None;
        }
        Some(Self::new(class, constructed, number))
    }

    /// Primitive universal tag.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, false, number)
    }

    /// Primitive application tag.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, false, number)
    }

    /// Primitive context-specific tag.
    pub const fn context(number: u32) -> Self {
        Self::new(Class::Context, false, number)
    }

    /// Primitive private tag.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, false, number)
    }

    /// Same tag with the constructed bit set.
    pub const fn into_constructed(self) -> Self {
        Tag(self.0 | ((CONSTRUCTED as u32) << 24))
    }

    /// Same tag with the constructed bit cleared.
    pub const fn into_primitive(self) -> Self {
        Tag(self.0 & !((CONSTRUCTED as u32) << 24))
    }

    /// Get the class of the tag.
    pub const fn class(self) -> Class {
        Class::from_bits((self.0 >> 24) as u8)
    }

    /// Check if the tag indicates a constructed encoding.
    pub const fn is_constructed(self) -> bool {
        (self.0 >> 24) as u8 & CONSTRUCTED != 0
    }

    /// Get the tag number.
    pub const fn number(self) -> u32 {
        self.0 & Self::MAX_NUMBER
    }

    /// The packed word.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns true if class and number match, ignoring the constructed bit.
    pub const fn same_type(self, other: Tag) -> bool {
        self.into_primitive().0 == other.into_primitive().0
    }

    /// Number of identifier octets this tag encodes to.
    pub const fn encoded_len(self) -> usize {
        let number = self.number();
        if number < HIGH_TAG_FORM as u32 {
            return 1;
        }
        let mut len = 2;
        let mut rest = number >> 7;
        while rest > 0 {
            len += 1;
            rest >>= 7;
        }
        len
    }

    fn first_octet(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match self.class() {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::Context => "CONTEXT",
            Class::Private => "PRIVATE",
        };
        write!(f, "[{} {}]", class, self.number())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_constructed() {
            write!(f, "Tag({} constructed)", self)
        } else {
            write!(f, "Tag({})", self)
        }
    }
}

/// Write the identifier octets for `tag`, returning how many were written.
pub fn encode_tag(buf: &mut ByteCursor, tag: Tag) -> usize {
    let number = tag.number();
    let first = tag.first_octet();

    if number < HIGH_TAG_FORM as u32 {
        buf.put_byte_reverse(first | number as u8);
        return 1;
    }

    // Last base-128 octet goes in first since we write backwards
    let mut rest = number;
    buf.put_byte_reverse((rest & 0x7F) as u8);
    rest >>= 7;
    let mut count = 1;
    while rest > 0 {
        buf.put_byte_reverse(0x80 | (rest & 0x7F) as u8);
        rest >>= 7;
        count += 1;
    }
    buf.put_byte_reverse(first | HIGH_TAG_FORM);
    count + 1
}

/// Read identifier octets, returning the tag and the number of octets consumed.
pub fn decode_tag(buf: &mut ByteCursor) -> Result<(Tag, usize)> {
    let offset = buf.position();
    let first = buf.get_byte();
    if buf.has_read_error() {
        return Err(Error::decode(offset, DecodeErrorKind::TruncatedData));
    }

    let class = Class::from_bits(first);
    let constructed = first & CONSTRUCTED != 0;
    if first & HIGH_TAG_FORM != HIGH_TAG_FORM {
        let number = (first & HIGH_TAG_FORM) as u32;
        return Ok((Tag::new(class, constructed, number), 1));
    }

    let mut number: u32 = 0;
    let mut consumed = 1;
    loop {
        let octet = buf.get_byte();
        if buf.has_read_error() {
            return Err(Error::decode(buf.position(), DecodeErrorKind::TruncatedData));
        }
        consumed += 1;
        number = (number << 7) | (octet & 0x7F) as u32;
        if octet & 0x80 == 0 {
            break;
        }
        if consumed == 5 {
            return Err(Error::decode(offset, DecodeErrorKind::TagTooLong));
        }
    }

    Ok((Tag::new(class, constructed, number), consumed))
}
