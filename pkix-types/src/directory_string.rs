//! DirectoryString type as defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! DirectoryString ::= CHOICE {
//!   teletexString     TeletexString (SIZE (1..MAX)),
//!   printableString   PrintableString (SIZE (1..MAX)),
//!   universalString   UniversalString (SIZE (1..MAX)),
//!   utf8String        UTF8String (SIZE (1..MAX)),
//!   bmpString         BMPString (SIZE (1..MAX))
//! }
//! ```
//!
//! The string kind is kept so that a decoded name re-encodes to the same
//! bytes. IA5String is accepted as well because emailAddress and
//! domainComponent use it.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::Element;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringKind {
    Utf8,
    Printable,
    Teletex,
    Ia5,
    Bmp,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryString {
    kind: StringKind,
    value: String,
}

impl DirectoryString {
    pub fn new(kind: StringKind, value: impl Into<String>) -> Self {
        DirectoryString {
            kind,
            value: value.into(),
        }
    }

    /// UTF8String, the RFC 5280 default for new certificates.
    pub fn utf8(value: impl Into<String>) -> Self {
        DirectoryString::new(StringKind::Utf8, value)
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Deref for DirectoryString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<&str> for DirectoryString {
    fn from(value: &str) -> Self {
        DirectoryString::utf8(value)
    }
}

impl DecodableFrom<Element> for DirectoryString {}

impl Decoder<Element, DirectoryString> for Element {
    type Error = Error;

    fn decode(&self) -> Result<DirectoryString> {
        let (kind, value) = match self {
            Element::UTF8String(s) => (StringKind::Utf8, s),
            Element::PrintableString(s) => (StringKind::Printable, s),
            Element::T61String(s) => (StringKind::Teletex, s),
            Element::IA5String(s) => (StringKind::Ia5, s),
            Element::BMPString(s) => (StringKind::Bmp, s),
            _ => return Err(Error::expected("DirectoryString", "a string type")),
        };
        Ok(DirectoryString::new(kind, value.clone()))
    }
}

impl EncodableTo<DirectoryString> for Element {}

impl Encoder<DirectoryString, Element> for DirectoryString {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let value = self.value.clone();
        Ok(match self.kind {
            StringKind::Utf8 => Element::UTF8String(value),
            StringKind::Printable => Element::PrintableString(value),
            StringKind::Teletex => Element::T61String(value),
            StringKind::Ia5 => Element::IA5String(value),
            StringKind::Bmp => Element::BMPString(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Element::UTF8String("example".into()), StringKind::Utf8)]
    #[case(Element::PrintableString("US".into()), StringKind::Printable)]
    #[case(Element::BMPString("Tokyo".into()), StringKind::Bmp)]
    #[case(Element::IA5String("a@example.com".into()), StringKind::Ia5)]
    fn test_directory_string_keeps_kind(#[case] element: Element, #[case] kind: StringKind) {
        let ds: DirectoryString = element.decode().unwrap();
        assert_eq!(kind, ds.kind());
        let back: Element = ds.encode().unwrap();
        assert_eq!(element, back);
    }

    #[test]
    fn test_directory_string_rejects_non_string() {
        let result: Result<DirectoryString> = Element::Null.decode();
        assert!(result.is_err());
    }
}
