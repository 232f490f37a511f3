use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag class, the top two bits of the identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    pub(crate) fn from_bits(b: u8) -> Self {
        match b >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    pub(crate) fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xc0,
        }
    }
}

/// Identifier octets of a TLV.
///
/// Tag numbers up to 30 fit in the low five bits. Larger numbers use the
/// high-tag-number form (five bits all set, then base-128 octets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u32,
}

pub(crate) const CONSTRUCTED_BIT: u8 = 0x20;
pub(crate) const HIGH_TAG_NUMBER: u8 = 0x1f;

impl Tag {
    pub const BOOLEAN: Tag = Tag::universal(1, false);
    pub const INTEGER: Tag = Tag::universal(2, false);
    pub const BIT_STRING: Tag = Tag::universal(3, false);
    pub const OCTET_STRING: Tag = Tag::universal(4, false);
    pub const NULL: Tag = Tag::universal(5, false);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(6, false);
    pub const UTF8_STRING: Tag = Tag::universal(12, false);
    pub const SEQUENCE: Tag = Tag::universal(16, true);
    pub const SET: Tag = Tag::universal(17, true);
    pub const PRINTABLE_STRING: Tag = Tag::universal(19, false);
    pub const T61_STRING: Tag = Tag::universal(20, false);
    pub const IA5_STRING: Tag = Tag::universal(22, false);
    pub const UTC_TIME: Tag = Tag::universal(23, false);
    pub const GENERALIZED_TIME: Tag = Tag::universal(24, false);
    pub const BMP_STRING: Tag = Tag::universal(30, false);

    pub const fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Tag {
            class,
            constructed,
            number,
        }
    }

    pub const fn universal(number: u32, constructed: bool) -> Self {
        Tag::new(TagClass::Universal, constructed, number)
    }

    /// `[slot]` in the context-specific class.
    pub const fn context(slot: u32, constructed: bool) -> Self {
        Tag::new(TagClass::ContextSpecific, constructed, slot)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn with_constructed(self, constructed: bool) -> Self {
        Tag {
            constructed,
            ..self
        }
    }

    /// True when `self` is a context-specific tag with number `slot`,
    /// regardless of form.
    pub fn is_context(&self, slot: u32) -> bool {
        self.class == TagClass::ContextSpecific && self.number == slot
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        let mut first = self.class.bits();
        if self.constructed {
            first |= CONSTRUCTED_BIT;
        }
        if self.number < HIGH_TAG_NUMBER as u32 {
            out.push(first | self.number as u8);
            return;
        }
        out.push(first | HIGH_TAG_NUMBER);
        let mut groups = Vec::new();
        let mut n = self.number;
        loop {
            groups.push((n & 0x7f) as u8);
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        let last = groups.len() - 1;
        for (i, g) in groups.iter().rev().enumerate() {
            out.push(if i == last { *g } else { *g | 0x80 });
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.constructed { "c" } else { "p" };
        match self.class {
            TagClass::Universal => write!(f, "UNIVERSAL {} ({})", self.number, form),
            TagClass::Application => write!(f, "[APPLICATION {}] ({})", self.number, form),
            TagClass::ContextSpecific => write!(f, "[{}] ({})", self.number, form),
            TagClass::Private => write!(f, "[PRIVATE {}] ({})", self.number, form),
        }
    }
}
