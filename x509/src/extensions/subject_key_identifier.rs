use std::fmt;

use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, OctetString};
use sslkit_keys::digest::digest;
use sslkit_pkix_types::{DigestAlgorithm, KeyIdentifier, SubjectPublicKeyInfo};

use super::error::{Error, Kind, Result};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.2
SubjectKeyIdentifier ::= KeyIdentifier
KeyIdentifier ::= OCTET STRING
*/

/// Subject Key Identifier extension ([RFC 5280 Section 4.2.1.2](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.2)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: KeyIdentifier,
}

impl SubjectKeyIdentifier {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            key_identifier: KeyIdentifier::new(bytes),
        }
    }

    /// Method (1) of RFC 5280 4.2.1.2: SHA-1 over the subjectPublicKey bits.
    pub fn from_spki(spki: &SubjectPublicKeyInfo) -> Self {
        Self::new(digest(
            DigestAlgorithm::Sha1,
            spki.subject_public_key().as_bytes(),
        ))
    }
}

impl Extension for SubjectKeyIdentifier {
    const OID: &'static str = "2.5.29.14";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for SubjectKeyIdentifier {}

impl Decoder<Element, SubjectKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectKeyIdentifier> {
        match self {
            Element::OctetString(os) => Ok(SubjectKeyIdentifier::new(os.as_bytes().to_vec())),
            _ => Err(Error::ExpectedOctetString(Kind::SubjectKeyIdentifier)),
        }
    }
}

impl EncodableTo<SubjectKeyIdentifier> for Element {}

impl Encoder<SubjectKeyIdentifier, Element> for SubjectKeyIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::OctetString(OctetString::from(
            self.key_identifier.as_bytes(),
        )))
    }
}

impl fmt::Display for SubjectKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_identifier)
    }
}

#[cfg(test)]
mod tests {
    use sslkit_asn1::BitString;
    use sslkit_pkix_types::{NamedCurve, PublicKeyAlgorithm};

    use super::*;

    #[test]
    fn test_subject_key_identifier_der() {
        let value = OctetString::from(vec![0x04, 0x03, 0xde, 0xad, 0xbe]);
        let ski = SubjectKeyIdentifier::parse(&value).unwrap();
        assert_eq!(&[0xde, 0xad, 0xbe], ski.key_identifier.as_bytes());
        assert_eq!("DE:AD:BE", ski.to_string());
        assert_eq!(value, ski.to_value().unwrap());
    }

    #[test]
    fn test_subject_key_identifier_from_spki() {
        let spki = SubjectPublicKeyInfo::new(
            PublicKeyAlgorithm::Ec(NamedCurve::P256)
                .to_identifier()
                .unwrap(),
            BitString::from_bytes(b"abc".to_vec()),
        );
        let ski = SubjectKeyIdentifier::from_spki(&spki);
        // SHA-1("abc")
        assert_eq!(
            "A9:99:3E:36:47:06:81:6A:BA:3E:25:71:78:50:C2:6C:9C:D0:D8:9D",
            ski.to_string()
        );
    }

    #[test]
    fn test_subject_key_identifier_expected_octet_string() {
        let result: Result<SubjectKeyIdentifier> = Element::Null.decode();
        assert!(result.is_err());
    }
}
