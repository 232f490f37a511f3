use std::fmt;

use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier, OctetString};

use super::error::{Error, Kind, Result};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.12
ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
KeyPurposeId ::= OBJECT IDENTIFIER
*/

/// Extended Key Usage extension ([RFC 5280 Section 4.2.1.12](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.12)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    pub const SERVER_AUTH: &'static str = "1.3.6.1.5.5.7.3.1";
    pub const CLIENT_AUTH: &'static str = "1.3.6.1.5.5.7.3.2";
    pub const CODE_SIGNING: &'static str = "1.3.6.1.5.5.7.3.3";
    pub const EMAIL_PROTECTION: &'static str = "1.3.6.1.5.5.7.3.4";
    pub const TIME_STAMPING: &'static str = "1.3.6.1.5.5.7.3.8";
    pub const OCSP_SIGNING: &'static str = "1.3.6.1.5.5.7.3.9";

    pub fn new(purposes: Vec<ObjectIdentifier>) -> Result<Self> {
        if purposes.is_empty() {
            return Err(Error::ExtendedKeyUsageEmpty);
        }
        Ok(Self { purposes })
    }

    pub fn contains(&self, purpose: &str) -> bool {
        self.purposes.iter().any(|oid| *oid == purpose)
    }

    /// Conventional purpose names, falling back to the dotted OID.
    pub fn names(&self) -> Vec<String> {
        self.purposes
            .iter()
            .map(|oid| {
                let name = match oid.to_string().as_str() {
                    Self::SERVER_AUTH => "TLS Web Server Authentication",
                    Self::CLIENT_AUTH => "TLS Web Client Authentication",
                    Self::CODE_SIGNING => "Code Signing",
                    Self::EMAIL_PROTECTION => "E-mail Protection",
                    Self::TIME_STAMPING => "Time Stamping",
                    Self::OCSP_SIGNING => "OCSP Signing",
                    "2.5.29.37.0" => "Any Extended Key Usage",
                    other => return other.to_string(),
                };
                name.to_string()
            })
            .collect()
    }
}

impl Extension for ExtendedKeyUsage {
    const OID: &'static str = "2.5.29.37";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for ExtendedKeyUsage {}

impl Decoder<Element, ExtendedKeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ExtendedKeyUsage> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::ExtendedKeyUsage));
        };
        let purposes = elements
            .iter()
            .map(|elem| match elem {
                Element::ObjectIdentifier(oid) => Ok(oid.clone()),
                _ => Err(Error::ExtendedKeyUsageExpectedOid),
            })
            .collect::<Result<Vec<_>>>()?;
        ExtendedKeyUsage::new(purposes)
    }
}

impl EncodableTo<ExtendedKeyUsage> for Element {}

impl Encoder<ExtendedKeyUsage, Element> for ExtendedKeyUsage {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        if self.purposes.is_empty() {
            return Err(Error::ExtendedKeyUsageEmpty);
        }
        Ok(Element::Sequence(
            self.purposes
                .iter()
                .cloned()
                .map(Element::ObjectIdentifier)
                .collect(),
        ))
    }
}

impl fmt::Display for ExtendedKeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}
