use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier};
use sslkit_pkix_types::Name;

use super::error::{Error, Kind, Result};

/*
RFC 5280 Section 4.2.1.6
GeneralName ::= CHOICE {
    otherName                       [0]     OtherName,
    rfc822Name                      [1]     IA5String,
    dNSName                         [2]     IA5String,
    x400Address                     [3]     ORAddress,
    directoryName                   [4]     Name,
    ediPartyName                    [5]     EDIPartyName,
    uniformResourceIdentifier       [6]     IA5String,
    iPAddress                       [7]     OCTET STRING,
    registeredID                    [8]     OBJECT IDENTIFIER }

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id }
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    OtherName {
        type_id: ObjectIdentifier,
        value: Element,
    },
    Rfc822Name(String),
    DnsName(String),
    DirectoryName(Name),
    Uri(String),
    IpAddress(IpAddr),
    RegisteredId(ObjectIdentifier),
    /// x400Address and ediPartyName, kept as decoded.
    Unsupported(Element),
}

fn ia5(data: &[u8]) -> Result<String> {
    if !data.is_ascii() {
        return Err(Error::GeneralNameInvalidAscii);
    }
    Ok(String::from_utf8_lossy(data).into_owned())
}

fn ip_address(data: &[u8]) -> Result<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(data) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(data) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    Err(Error::InvalidIpAddressLength(data.len()))
}

impl DecodableFrom<Element> for GeneralName {}

impl Decoder<Element, GeneralName> for Element {
    type Error = Error;

    fn decode(&self) -> Result<GeneralName> {
        match self {
            Element::ContextSpecific { slot: 0, elements } => match elements.as_slice() {
                [Element::ObjectIdentifier(type_id), Element::ContextSpecific { slot: 0, elements }] => {
                    match elements.as_slice() {
                        [value] => Ok(GeneralName::OtherName {
                            type_id: type_id.clone(),
                            value: value.clone(),
                        }),
                        _ => Err(Error::InvalidOtherName),
                    }
                }
                _ => Err(Error::InvalidOtherName),
            },
            Element::Implicit { slot: 1, data } => Ok(GeneralName::Rfc822Name(ia5(data)?)),
            Element::Implicit { slot: 2, data } => Ok(GeneralName::DnsName(ia5(data)?)),
            Element::ContextSpecific { slot: 4, elements } => match elements.as_slice() {
                [name] => Ok(GeneralName::DirectoryName(name.decode()?)),
                _ => Err(Error::UnexpectedElementType(Kind::GeneralName)),
            },
            Element::Implicit { slot: 6, data } => Ok(GeneralName::Uri(ia5(data)?)),
            Element::Implicit { slot: 7, data } => Ok(GeneralName::IpAddress(ip_address(data)?)),
            Element::Implicit { slot: 8, data } => Ok(GeneralName::RegisteredId(
                ObjectIdentifier::try_from(data.as_slice())?,
            )),
            Element::ContextSpecific { slot: 3 | 5, .. } => {
                Ok(GeneralName::Unsupported(self.clone()))
            }
            _ => Err(Error::UnexpectedElementType(Kind::GeneralName)),
        }
    }
}

impl EncodableTo<GeneralName> for Element {}

impl Encoder<GeneralName, Element> for GeneralName {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let element = match self {
            GeneralName::OtherName { type_id, value } => Element::ContextSpecific {
                slot: 0,
                elements: vec![
                    Element::ObjectIdentifier(type_id.clone()),
                    Element::explicit(0, value.clone()),
                ],
            },
            GeneralName::Rfc822Name(s) => Element::Implicit {
                slot: 1,
                data: ia5(s.as_bytes())?.into_bytes(),
            },
            GeneralName::DnsName(s) => Element::Implicit {
                slot: 2,
                data: ia5(s.as_bytes())?.into_bytes(),
            },
            GeneralName::DirectoryName(name) => Element::explicit(4, name.encode()?),
            GeneralName::Uri(s) => Element::Implicit {
                slot: 6,
                data: ia5(s.as_bytes())?.into_bytes(),
            },
            GeneralName::IpAddress(IpAddr::V4(ip)) => Element::Implicit {
                slot: 7,
                data: ip.octets().to_vec(),
            },
            GeneralName::IpAddress(IpAddr::V6(ip)) => Element::Implicit {
                slot: 7,
                data: ip.octets().to_vec(),
            },
            GeneralName::RegisteredId(oid) => Element::Implicit {
                slot: 8,
                data: oid.to_der_bytes()?,
            },
            GeneralName::Unsupported(element) => element.clone(),
        };
        Ok(element)
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName { type_id, .. } => write!(f, "othername:{}", type_id),
            GeneralName::Rfc822Name(s) => write!(f, "email:{}", s),
            GeneralName::DnsName(s) => write!(f, "DNS:{}", s),
            GeneralName::DirectoryName(name) => write!(f, "DirName:{}", name),
            GeneralName::Uri(s) => write!(f, "URI:{}", s),
            GeneralName::IpAddress(ip) => write!(f, "IP Address:{}", ip),
            GeneralName::RegisteredId(oid) => write!(f, "Registered ID:{}", oid),
            GeneralName::Unsupported(element) => write!(f, "<unsupported {}>", element.name()),
        }
    }
}

impl Serialize for GeneralName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
pub(crate) fn decode_general_names(elements: &[Element], kind: Kind) -> Result<Vec<GeneralName>> {
    if elements.is_empty() {
        return Err(Error::AtLeastOneGeneralNameRequired(kind));
    }
    elements.iter().map(|elem| elem.decode()).collect()
}

pub(crate) fn encode_general_names(names: &[GeneralName], kind: Kind) -> Result<Vec<Element>> {
    if names.is_empty() {
        return Err(Error::AtLeastOneGeneralNameRequired(kind));
    }
    names.iter().map(|name| name.encode()).collect()
}
