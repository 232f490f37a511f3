use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer, OctetString};
use sslkit_pkix_types::{CertificateSerialNumber, KeyIdentifier};

use super::error::{Error, Kind, Result};
use super::general_name::{GeneralName, decode_general_names, encode_general_names};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.1
AuthorityKeyIdentifier ::= SEQUENCE {
    keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL  }
*/

/// Authority Key Identifier extension ([RFC 5280 Section 4.2.1.1](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.1)).
///
/// Issued certificates carry only the issuer's key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<KeyIdentifier>,
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    pub authority_cert_serial_number: Option<CertificateSerialNumber>,
}

impl AuthorityKeyIdentifier {
    pub fn from_key_identifier(key_identifier: KeyIdentifier) -> Self {
        Self {
            key_identifier: Some(key_identifier),
            ..Default::default()
        }
    }
}

impl Extension for AuthorityKeyIdentifier {
    const OID: &'static str = "2.5.29.35";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for AuthorityKeyIdentifier {}

impl Decoder<Element, AuthorityKeyIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AuthorityKeyIdentifier> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence(Kind::AuthorityKeyIdentifier));
        };
        elements
            .iter()
            .try_fold(AuthorityKeyIdentifier::default(), |mut aki, elem| {
                match elem {
                    Element::Implicit { slot: 0, data } => {
                        aki.key_identifier = Some(KeyIdentifier::new(data.clone()));
                    }
                    Element::ContextSpecific { slot: 1, elements } => {
                        aki.authority_cert_issuer = Some(decode_general_names(
                            elements,
                            Kind::AuthorityKeyIdentifier,
                        )?);
                    }
                    Element::Implicit { slot: 2, data } => {
                        aki.authority_cert_serial_number =
                            Some(CertificateSerialNumber::from(Integer::from(data.as_slice())));
                    }
                    _ => {
                        return Err(Error::UnexpectedElementType(
                            Kind::AuthorityKeyIdentifier,
                        ));
                    }
                }
                Ok(aki)
            })
    }
}

impl EncodableTo<AuthorityKeyIdentifier> for Element {}

impl Encoder<AuthorityKeyIdentifier, Element> for AuthorityKeyIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = Vec::new();
        if let Some(key_id) = &self.key_identifier {
            elements.push(Element::Implicit {
                slot: 0,
                data: key_id.as_bytes().to_vec(),
            });
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            elements.push(Element::ContextSpecific {
                slot: 1,
                elements: encode_general_names(issuer, Kind::AuthorityKeyIdentifier)?,
            });
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            elements.push(Element::Implicit {
                slot: 2,
                data: serial.to_der_bytes(),
            });
        }
        Ok(Element::Sequence(elements))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_authority_key_identifier_key_id_only() {
        // SEQUENCE { [0] 01 02 03 04 }
        let value = OctetString::from(vec![0x30, 0x06, 0x80, 0x04, 0x01, 0x02, 0x03, 0x04]);
        let aki = AuthorityKeyIdentifier::parse(&value).unwrap();
        assert_eq!(
            AuthorityKeyIdentifier::from_key_identifier(KeyIdentifier::new(vec![1, 2, 3, 4])),
            aki
        );
        assert_eq!(value, aki.to_value().unwrap());
    }

    #[test]
    fn test_authority_key_identifier_all_fields() {
        let aki = AuthorityKeyIdentifier {
            key_identifier: Some(KeyIdentifier::new(vec![0xaa; 20])),
            authority_cert_issuer: Some(vec![GeneralName::DnsName("ca.test".to_string())]),
            authority_cert_serial_number: Some(CertificateSerialNumber::from(Integer::from(
                0x1234u32,
            ))),
        };
        let decoded = AuthorityKeyIdentifier::parse(&aki.to_value().unwrap()).unwrap();
        assert_eq!(aki, decoded);
    }

    #[rstest]
    #[case::not_sequence(Element::Null)]
    #[case::wrong_tag(Element::Sequence(vec![Element::Implicit { slot: 5, data: vec![] }]))]
    #[case::empty_issuer(Element::Sequence(vec![Element::ContextSpecific { slot: 1, elements: vec![] }]))]
    fn test_authority_key_identifier_decode_failure(#[case] input: Element) {
        let result: Result<AuthorityKeyIdentifier> = input.decode();
        assert!(result.is_err());
    }
}
