use std::fmt;

use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, OctetString};

use super::error::{Error, Kind, Result};
use super::general_name::{GeneralName, decode_general_names, encode_general_names};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames
GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
*/

/// Subject Alternative Name extension ([RFC 5280 Section 4.2.1.6](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.6)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    pub fn new(names: Vec<GeneralName>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::AtLeastOneGeneralNameRequired(Kind::SubjectAltName));
        }
        Ok(Self { names })
    }

    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::DnsName(dns) => Some(dns.as_str()),
            _ => None,
        })
    }
}

impl Extension for SubjectAltName {
    const OID: &'static str = "2.5.29.17";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for SubjectAltName {}

impl Decoder<Element, SubjectAltName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectAltName> {
        match self {
            Element::Sequence(elements) => Ok(SubjectAltName {
                names: decode_general_names(elements, Kind::SubjectAltName)?,
            }),
            _ => Err(Error::ExpectedSequence(Kind::SubjectAltName)),
        }
    }
}

impl EncodableTo<SubjectAltName> for Element {}

impl Encoder<SubjectAltName, Element> for SubjectAltName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(encode_general_names(
            &self.names,
            Kind::SubjectAltName,
        )?))
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .names
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}
