//! Name and related types
//!
//! Defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//! ```
//!
//! The textual form follows RFC 4514 in the order the attributes appear in
//! the certificate (`CN=example.com, O=Example Corp, C=US`).

use std::fmt;
use std::str::FromStr;

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier};

use crate::OidName;
use crate::directory_string::{DirectoryString, StringKind};
use crate::error::{Error, Result};

/// (short name, OID, string kind used when building from text)
const ATTRIBUTES: &[(&str, &str, StringKind)] = &[
    ("CN", "2.5.4.3", StringKind::Utf8),
    ("SN", "2.5.4.4", StringKind::Utf8),
    ("serialNumber", "2.5.4.5", StringKind::Printable),
    ("C", "2.5.4.6", StringKind::Printable),
    ("L", "2.5.4.7", StringKind::Utf8),
    ("ST", "2.5.4.8", StringKind::Utf8),
    ("street", "2.5.4.9", StringKind::Utf8),
    ("O", "2.5.4.10", StringKind::Utf8),
    ("OU", "2.5.4.11", StringKind::Utf8),
    ("title", "2.5.4.12", StringKind::Utf8),
    ("postalCode", "2.5.4.17", StringKind::Utf8),
    ("GN", "2.5.4.42", StringKind::Utf8),
    ("initials", "2.5.4.43", StringKind::Utf8),
    ("dnQualifier", "2.5.4.46", StringKind::Printable),
    ("pseudonym", "2.5.4.65", StringKind::Utf8),
    ("emailAddress", "1.2.840.113549.1.9.1", StringKind::Ia5),
    ("UID", "0.9.2342.19200300.100.1.1", StringKind::Utf8),
    ("DC", "0.9.2342.19200300.100.1.25", StringKind::Ia5),
];

fn lookup_by_name(name: &str) -> Option<&'static (&'static str, &'static str, StringKind)> {
    ATTRIBUTES
        .iter()
        .find(|(short, _, _)| short.eq_ignore_ascii_case(name))
}

fn lookup_by_oid(oid: &ObjectIdentifier) -> Option<&'static (&'static str, &'static str, StringKind)> {
    let oid = oid.to_string();
    ATTRIBUTES.iter().find(|(_, o, _)| *o == oid)
}

fn is_printable(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c))
}

/// X.509 Distinguished Name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    pub rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    /// Create a new Name with the given RDN sequence
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Self { rdn_sequence }
    }

    /// One single-valued RDN per pair, in order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let rdn_sequence = pairs
            .into_iter()
            .map(|(name, value)| {
                AttributeTypeAndValue::from_text(name, value)
                    .map(|attr| RelativeDistinguishedName::new(vec![attr]))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Name { rdn_sequence })
    }

    /// Get a reference to the RDN sequence
    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }

    pub fn is_empty(&self) -> bool {
        self.rdn_sequence.is_empty()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdn_sequence.iter().flat_map(|rdn| rdn.attributes.iter())
    }

    /// First value of the attribute with the given short name (`CN`, `O`, ...).
    pub fn get(&self, short_name: &str) -> Option<&str> {
        let (_, oid, _) = lookup_by_name(short_name)?;
        self.attributes()
            .find(|attr| attr.attribute_type == *oid)
            .and_then(|attr| attr.value_str())
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get("CN")
    }

    /// Exact match on structure, attribute types and values. The ASN.1
    /// string type of a value is not compared.
    pub fn matches(&self, other: &Name) -> bool {
        self.rdn_sequence.len() == other.rdn_sequence.len()
            && self
                .rdn_sequence
                .iter()
                .zip(other.rdn_sequence.iter())
                .all(|(a, b)| {
                    a.attributes.len() == b.attributes.len()
                        && a.attributes.iter().zip(b.attributes.iter()).all(|(x, y)| {
                            x.attribute_type == y.attribute_type
                                && match (x.value_str(), y.value_str()) {
                                    (Some(l), Some(r)) => l == r,
                                    _ => x.value == y.value,
                                }
                        })
                })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .rdn_sequence
            .iter()
            .map(|rdn| {
                rdn.attributes
                    .iter()
                    .map(|attr| attr.to_string())
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

/// Unescaped value text. Whitespace is trimmed only outside the span of
/// escaped characters, so `\ ` at either edge survives.
#[derive(Default)]
struct ValueText {
    text: String,
    escaped: Option<(usize, usize)>,
}

impl ValueText {
    fn push_escaped(&mut self, c: char) {
        let start = self.text.len();
        self.text.push(c);
        let end = self.text.len();
        self.escaped = Some(self.escaped.map_or((start, end), |(first, _)| (first, end)));
    }

    fn trimmed(&self) -> &str {
        let lead = self.text.len() - self.text.trim_start().len();
        let tail = self.text.trim_end().len();
        let (start, end) = match self.escaped {
            Some((first, last)) => (lead.min(first), tail.max(last)),
            None => (lead, tail),
        };
        self.text.get(start..end.max(start)).unwrap_or_default()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.escaped = None;
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses `CN=example.com, O=Example Corp, C=US`. `+` joins attributes of
    /// a multi-valued RDN and `\` escapes the next character.
    fn from_str(s: &str) -> Result<Self> {
        let mut rdn_sequence = Vec::new();
        let mut current = Vec::new();
        let mut key = String::new();
        let mut value = ValueText::default();
        let mut in_value = false;
        let mut chars = s.chars();

        let finish = |key: &mut String, value: &mut ValueText, in_value: &mut bool| {
            if !*in_value || key.trim().is_empty() {
                return Err(Error::InvalidDistinguishedName(s.to_string()));
            }
            let attr = AttributeTypeAndValue::from_text(key.trim(), value.trimmed())?;
            key.clear();
            value.clear();
            *in_value = false;
            Ok(attr)
        };

        if s.trim().is_empty() {
            return Ok(Name::default());
        }

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let escaped = chars
                        .next()
                        .ok_or_else(|| Error::InvalidDistinguishedName(s.to_string()))?;
                    if in_value {
                        value.push_escaped(escaped);
                    } else {
                        key.push(escaped);
                    }
                }
                '=' if !in_value => in_value = true,
                '+' => current.push(finish(&mut key, &mut value, &mut in_value)?),
                ',' | ';' => {
                    current.push(finish(&mut key, &mut value, &mut in_value)?);
                    rdn_sequence.push(RelativeDistinguishedName::new(std::mem::take(
                        &mut current,
                    )));
                }
                c if in_value => value.text.push(c),
                c => key.push(c),
            }
        }
        current.push(finish(&mut key, &mut value, &mut in_value)?);
        rdn_sequence.push(RelativeDistinguishedName::new(current));

        Ok(Name { rdn_sequence })
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        let Element::Sequence(rdns) = self else {
            return Err(Error::expected("Name", "SEQUENCE"));
        };
        let rdn_sequence = rdns
            .iter()
            .map(|rdn| rdn.decode())
            .collect::<Result<Vec<RelativeDistinguishedName>>>()?;
        Ok(Name { rdn_sequence })
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let rdns = self
            .rdn_sequence
            .iter()
            .map(|rdn| rdn.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Sequence(rdns))
    }
}

/// Relative Distinguished Name (RDN)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    pub attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        Self { attributes }
    }
}

impl DecodableFrom<Element> for RelativeDistinguishedName {}

impl Decoder<Element, RelativeDistinguishedName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RelativeDistinguishedName> {
        let Element::Set(attrs) = self else {
            return Err(Error::expected("RelativeDistinguishedName", "SET"));
        };
        if attrs.is_empty() {
            return Err(Error::InvalidAttributeTypeAndValue(
                "empty RelativeDistinguishedName".to_string(),
            ));
        }
        let attributes = attrs
            .iter()
            .map(|attr| attr.decode())
            .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
        Ok(RelativeDistinguishedName { attributes })
    }
}

impl EncodableTo<RelativeDistinguishedName> for Element {}

impl Encoder<RelativeDistinguishedName, Element> for RelativeDistinguishedName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let attrs = self
            .attributes
            .iter()
            .map(|attr| attr.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Set(attrs))
    }
}

/// Attribute Type and Value pair. The value is kept as the element it was
/// encoded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    pub attribute_type: ObjectIdentifier,
    pub value: Element,
}

impl AttributeTypeAndValue {
    pub fn new(attribute_type: ObjectIdentifier, value: Element) -> Self {
        Self {
            attribute_type,
            value,
        }
    }

    /// Builds an attribute from a short name (or dotted OID) and its text.
    ///
    /// `C`, `serialNumber` and `dnQualifier` use PrintableString,
    /// `emailAddress` and `DC` use IA5String, everything else UTF8String.
    pub fn from_text(name: &str, value: &str) -> Result<Self> {
        let (attribute_type, kind) = match lookup_by_name(name) {
            Some((_, oid, kind)) => (ObjectIdentifier::from_str(oid)?, *kind),
            None if name.starts_with(|c: char| c.is_ascii_digit()) => (
                ObjectIdentifier::from_str(name)
                    .map_err(|_| Error::UnknownAttributeName(name.to_string()))?,
                StringKind::Utf8,
            ),
            None => return Err(Error::UnknownAttributeName(name.to_string())),
        };
        let kind = match kind {
            StringKind::Printable if !is_printable(value) => StringKind::Utf8,
            StringKind::Ia5 if !value.is_ascii() => StringKind::Utf8,
            kind => kind,
        };
        let value = DirectoryString::new(kind, value).encode()?;
        Ok(Self {
            attribute_type,
            value,
        })
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn short_name(&self) -> Option<&'static str> {
        lookup_by_oid(&self.attribute_type).map(|(short, _, _)| *short)
    }
}

impl OidName for AttributeTypeAndValue {
    fn oid_name(&self) -> Option<&'static str> {
        self.short_name()
    }
}

fn escape(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        let edge = (i == 0 && (c == ' ' || c == '#')) || (i == last && c == ' ');
        if edge || matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self
            .short_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.attribute_type.to_string());
        match self.value_str() {
            Some(s) => write!(f, "{}={}", key, escape(s)),
            None => {
                // RFC 4514 2.4: non-string values as #hex of the BER encoding
                let hex = self
                    .value
                    .to_der()
                    .map(|der| der.iter().map(|b| format!("{:02x}", b)).collect::<String>())
                    .map_err(|_| fmt::Error)?;
                write!(f, "{}=#{}", key, hex)
            }
        }
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        match self.as_sequence() {
            Some([Element::ObjectIdentifier(oid), value]) => Ok(AttributeTypeAndValue {
                attribute_type: oid.clone(),
                value: value.clone(),
            }),
            Some(_) => Err(Error::InvalidAttributeTypeAndValue(
                "expected OBJECT IDENTIFIER and value".to_string(),
            )),
            None => Err(Error::expected("AttributeTypeAndValue", "SEQUENCE")),
        }
    }
}

impl EncodableTo<AttributeTypeAndValue> for Element {}

impl Encoder<AttributeTypeAndValue, Element> for AttributeTypeAndValue {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.attribute_type.clone()),
            self.value.clone(),
        ]))
    }
}
