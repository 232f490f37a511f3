//! Subject Public Key Info
//!
//! RFC 5280 Section 4.1.2.7
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//! ```
//!
//! Used in:
//! - X.509 certificates (RFC 5280)
//! - PKCS#10 certificate signing requests (RFC 2986)

use serde::{Serialize, ser::SerializeStruct};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{BitString, Element};

use crate::OidName;
use crate::algorithm::{AlgorithmIdentifier, PublicKeyAlgorithm};
use crate::error::{Error, Result};

/// Subject Public Key Info
///
/// Contains the algorithm identifier and the public key itself. For RSA the
/// bit string holds a PKCS#1 RSAPublicKey, for EC the uncompressed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
        Self {
            algorithm,
            subject_public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    pub fn key_algorithm(&self) -> Result<PublicKeyAlgorithm> {
        PublicKeyAlgorithm::try_from(&self.algorithm)
    }

    /// Modulus length for RSA, curve size for EC.
    pub fn key_bits(&self) -> Result<usize> {
        match self.key_algorithm()? {
            PublicKeyAlgorithm::Ec(curve) => Ok(curve.bits()),
            PublicKeyAlgorithm::Rsa => {
                let element = Element::from_der(self.subject_public_key.as_bytes())?;
                match element.as_sequence() {
                    Some([Element::Integer(n), Element::Integer(_)]) => Ok(n
                        .to_biguint()
                        .map(|n| n.bits() as usize)
                        .unwrap_or_default()),
                    _ => Err(Error::expected("RSAPublicKey", "SEQUENCE of two INTEGERs")),
                }
            }
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element = self.encode()?;
        Ok(element.to_der()?)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }
}

impl Serialize for SubjectPublicKeyInfo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SubjectPublicKeyInfo", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("key_bits", &self.key_bits().ok())?;
        state.end()
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        match self.as_sequence() {
            Some([algorithm, Element::BitString(subject_public_key)]) => {
                Ok(SubjectPublicKeyInfo {
                    algorithm: algorithm.decode()?,
                    subject_public_key: subject_public_key.clone(),
                })
            }
            Some(_) => Err(Error::expected(
                "SubjectPublicKeyInfo",
                "AlgorithmIdentifier and BIT STRING",
            )),
            None => Err(Error::expected("SubjectPublicKeyInfo", "SEQUENCE")),
        }
    }
}

impl EncodableTo<SubjectPublicKeyInfo> for Element {}

impl Encoder<SubjectPublicKeyInfo, Element> for SubjectPublicKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let algorithm_elm = self.algorithm.encode()?;
        let public_key_elm = Element::BitString(self.subject_public_key.clone());
        Ok(Element::Sequence(vec![algorithm_elm, public_key_elm]))
    }
}

impl OidName for SubjectPublicKeyInfo {
    fn oid_name(&self) -> Option<&'static str> {
        self.algorithm.oid_name()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sslkit_asn1::{Integer, OctetString};

    use super::*;
    use crate::algorithm::NamedCurve;

    fn rsa_spki(modulus: &[u8]) -> SubjectPublicKeyInfo {
        let key = Element::Sequence(vec![
            Element::Integer(Integer::from_unsigned_bytes(modulus)),
            Element::Integer(Integer::from(65537u32)),
        ]);
        SubjectPublicKeyInfo::new(
            PublicKeyAlgorithm::Rsa.to_identifier().unwrap(),
            BitString::from_bytes(key.to_der().unwrap()),
        )
    }

    #[test]
    fn test_subject_public_key_info_round_trip() {
        let spki = rsa_spki(&[0xc5; 256]);
        let der = spki.to_der().unwrap();
        let decoded = SubjectPublicKeyInfo::from_der(&der).unwrap();
        assert_eq!(spki, decoded);
        assert_eq!(Some("rsaEncryption"), decoded.oid_name());
    }

    #[rstest]
    #[case(rsa_spki(&[0xc5; 256]), 2048)]
    #[case(rsa_spki(&[0x7f; 384]), 3071)]
    #[case(SubjectPublicKeyInfo::new(
        PublicKeyAlgorithm::Ec(NamedCurve::P384).to_identifier().unwrap(),
        BitString::from_bytes(vec![0x04; 97]),
    ), 384)]
    fn test_key_bits(#[case] spki: SubjectPublicKeyInfo, #[case] expected: usize) {
        assert_eq!(expected, spki.key_bits().unwrap());
    }

    #[test]
    fn test_subject_public_key_info_invalid_public_key_type() {
        let algorithm = PublicKeyAlgorithm::Rsa.to_identifier().unwrap();
        let element = Element::Sequence(vec![
            algorithm.encode().unwrap(),
            Element::OctetString(OctetString::from(vec![1, 2, 3])),
        ]);
        let result: Result<SubjectPublicKeyInfo> = element.decode();
        assert!(matches!(result, Err(Error::Expected { .. })));
    }
}
