//! ```asn1
//! SafeContents ::= SEQUENCE OF SafeBag
//!
//! SafeBag ::= SEQUENCE {
//!     bagId         BAG-TYPE.&id ({PKCS12BagSet}),
//!     bagValue      [0] EXPLICIT BAG-TYPE.&Type({PKCS12BagSet}{@bagId}),
//!     bagAttributes SET OF PKCS12Attribute OPTIONAL
//! }
//!
//! CertBag ::= SEQUENCE {
//!     certId    BAG-TYPE.&id ({CertTypes}),
//!     certValue [0] EXPLICIT BAG-TYPE.&Type ({CertTypes}{@certId})
//! }
//! ```

use std::fmt;

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier, OctetString};
use zeroize::Zeroizing;

use super::error::{Error, Result};
use crate::pkcs8::EncryptedPrivateKeyInfo;
use crate::pkcs9::{Attribute, Attributes, FriendlyName, LocalKeyId};

pub const OID_KEY_BAG: &str = "1.2.840.113549.1.12.10.1.1";
pub const OID_PKCS8_SHROUDED_KEY_BAG: &str = "1.2.840.113549.1.12.10.1.2";
pub const OID_CERT_BAG: &str = "1.2.840.113549.1.12.10.1.3";
const OID_X509_CERTIFICATE: &str = "1.2.840.113549.1.9.22.1";

#[derive(Clone, PartialEq, Eq)]
pub enum BagValue {
    /// Unencrypted PrivateKeyInfo DER
    Key(Zeroizing<Vec<u8>>),
    ShroudedKey(EncryptedPrivateKeyInfo),
    /// X.509 certificate DER
    Certificate(Vec<u8>),
    Other {
        bag_id: ObjectIdentifier,
        value: Element,
    },
}

impl fmt::Debug for BagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BagValue::Key(_) => f.write_str("Key(..)"),
            BagValue::ShroudedKey(_) => f.write_str("ShroudedKey(..)"),
            BagValue::Certificate(der) => write!(f, "Certificate({} bytes)", der.len()),
            BagValue::Other { bag_id, .. } => write!(f, "Other({})", bag_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeBag {
    pub value: BagValue,
    pub attributes: Attributes,
}

impl SafeBag {
    pub fn new(value: BagValue) -> Self {
        SafeBag {
            value,
            attributes: Attributes::default(),
        }
    }

    pub fn with_attribute<T: Attribute>(mut self, attribute: &T) -> Result<Self> {
        self.attributes.push(attribute)?;
        Ok(self)
    }

    pub fn friendly_name(&self) -> Result<Option<String>> {
        let name: Option<FriendlyName> = self.attributes.attribute()?;
        Ok(name.map(|n| n.name().to_string()))
    }

    pub fn local_key_id(&self) -> Result<Option<Vec<u8>>> {
        let id: Option<LocalKeyId> = self.attributes.attribute()?;
        Ok(id.map(|id| id.as_bytes().to_vec()))
    }

    fn bag_id(&self) -> Result<ObjectIdentifier> {
        let oid = match &self.value {
            BagValue::Key(_) => OID_KEY_BAG,
            BagValue::ShroudedKey(_) => OID_PKCS8_SHROUDED_KEY_BAG,
            BagValue::Certificate(_) => OID_CERT_BAG,
            BagValue::Other { bag_id, .. } => return Ok(bag_id.clone()),
        };
        Ok(oid.parse()?)
    }
}

fn decode_cert_bag(value: &Element) -> Result<BagValue> {
    match value.as_sequence() {
        Some([Element::ObjectIdentifier(cert_id), Element::ContextSpecific { slot: 0, elements }])
            if *cert_id == OID_X509_CERTIFICATE =>
        {
            match elements.as_slice() {
                [Element::OctetString(der)] => Ok(BagValue::Certificate(der.as_bytes().to_vec())),
                _ => Err(Error::InvalidStructure("certValue must be an OCTET STRING")),
            }
        }
        Some([Element::ObjectIdentifier(_), ..]) => Ok(BagValue::Other {
            bag_id: OID_CERT_BAG.parse()?,
            value: value.clone(),
        }),
        _ => Err(Error::InvalidStructure("CertBag must be a SEQUENCE")),
    }
}

impl DecodableFrom<Element> for SafeBag {}

impl Decoder<Element, SafeBag> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SafeBag> {
        let (bag_id, value, attributes) = match self.as_sequence() {
            Some([Element::ObjectIdentifier(id), Element::ContextSpecific { slot: 0, elements }]) => {
                (id, elements, None)
            }
            Some(
                [
                    Element::ObjectIdentifier(id),
                    Element::ContextSpecific { slot: 0, elements },
                    attributes @ Element::Set(_),
                ],
            ) => (id, elements, Some(attributes)),
            _ => return Err(Error::InvalidStructure("SafeBag must be a SEQUENCE")),
        };
        let [value] = value.as_slice() else {
            return Err(Error::InvalidStructure("bagValue must hold one element"));
        };

        let value = if *bag_id == OID_KEY_BAG {
            BagValue::Key(Zeroizing::new(value.to_der()?))
        } else if *bag_id == OID_PKCS8_SHROUDED_KEY_BAG {
            BagValue::ShroudedKey(value.decode()?)
        } else if *bag_id == OID_CERT_BAG {
            decode_cert_bag(value)?
        } else {
            BagValue::Other {
                bag_id: bag_id.clone(),
                value: value.clone(),
            }
        };
        let attributes = match attributes {
            Some(attributes) => attributes.decode()?,
            None => Attributes::default(),
        };
        Ok(SafeBag { value, attributes })
    }
}

impl EncodableTo<SafeBag> for Element {}

impl Encoder<SafeBag, Element> for SafeBag {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let value = match &self.value {
            BagValue::Key(der) => Element::from_der(der)?,
            BagValue::ShroudedKey(key) => key.encode()?,
            BagValue::Certificate(der) => Element::Sequence(vec![
                Element::ObjectIdentifier(OID_X509_CERTIFICATE.parse()?),
                Element::explicit(0, Element::OctetString(OctetString::from(der.clone()))),
            ]),
            BagValue::Other { value, .. } => value.clone(),
        };
        let mut elements = vec![
            Element::ObjectIdentifier(self.bag_id()?),
            Element::explicit(0, value),
        ];
        if !self.attributes.is_empty() {
            elements.push(Element::Set(self.attributes.to_elements()?));
        }
        Ok(Element::Sequence(elements))
    }
}

pub(crate) fn decode_safe_contents(der: &[u8]) -> Result<Vec<SafeBag>> {
    match Element::from_der(der)? {
        Element::Sequence(bags) => bags.iter().map(|bag| bag.decode()).collect(),
        _ => Err(Error::InvalidStructure("SafeContents must be a SEQUENCE")),
    }
}

pub(crate) fn encode_safe_contents(bags: &[SafeBag]) -> Result<Vec<u8>> {
    let bags = bags
        .iter()
        .map(|bag| bag.encode())
        .collect::<Result<Vec<Element>>>()?;
    Ok(Element::Sequence(bags).to_der()?)
}
