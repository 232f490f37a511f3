//! PKIX Extension type
//!
//! RFC 5280 Section 4.1.2.9
//!
//! ```asn1
//! Extension  ::=  SEQUENCE  {
//!     extnID      OBJECT IDENTIFIER,
//!     critical    BOOLEAN DEFAULT FALSE,
//!     extnValue   OCTET STRING
//! }
//! ```
//!
//! The raw form shared by certificates and the PKCS#9 extensionRequest
//! attribute; typed views live in the x509 crate.

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier, OctetString};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self {
            id,
            critical,
            value,
        }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.id
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// DER encoding of the extension's own ASN.1 value.
    pub fn value(&self) -> &OctetString {
        &self.value
    }
}

impl DecodableFrom<Element> for Extension {}

impl Decoder<Element, Extension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extension> {
        let (id, critical, value) = match self.as_sequence() {
            Some([Element::ObjectIdentifier(id), Element::OctetString(value)]) => {
                (id, false, value)
            }
            Some(
                [
                    Element::ObjectIdentifier(id),
                    Element::Boolean(critical),
                    Element::OctetString(value),
                ],
            ) => (id, *critical, value),
            Some(_) => {
                return Err(Error::InvalidExtension(
                    "expected extnID, optional critical and extnValue".to_string(),
                ));
            }
            None => return Err(Error::expected("Extension", "SEQUENCE")),
        };
        Ok(Extension::new(id.clone(), critical, value.clone()))
    }
}

impl EncodableTo<Extension> for Element {}

impl Encoder<Extension, Element> for Extension {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.id.clone())];
        // DEFAULT FALSE is omitted in DER
        if self.critical {
            elements.push(Element::Boolean(true));
        }
        elements.push(Element::OctetString(self.value.clone()));
        Ok(Element::Sequence(elements))
    }
}
