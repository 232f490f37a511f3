use std::str::FromStr;

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer};
use sslkit_keys::PublicKey;
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkcs::pkcs9::{Attributes, ExtensionRequest};
use sslkit_pkix_types::{Name, SignatureAlgorithm, SubjectPublicKeyInfo};

use crate::certificate::{signature_algorithm, signature_bits, split_signed};
use crate::error::{Error, Result};
use crate::extensions::{Extension, Extensions, RawExtension};

/*
RFC 2986 Section 4

CertificationRequest ::= SEQUENCE {
    certificationRequestInfo CertificationRequestInfo,
    signatureAlgorithm AlgorithmIdentifier{{ SignatureAlgorithms }},
    signature          BIT STRING
}

CertificationRequestInfo ::= SEQUENCE {
    version       INTEGER { v1(0) } (v1,...),
    subject       Name,
    subjectPKInfo SubjectPublicKeyInfo{{ PKInfoAlgorithms }},
    attributes    [0] Attributes{{ CRIAttributes }}
}
*/

/// The signed portion of a PKCS#10 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequestInfo {
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub attributes: Attributes,
}

impl CertificationRequestInfo {
    /// Extensions carried in the extensionRequest attribute, empty when absent.
    pub fn requested_extensions(&self) -> Result<Extensions> {
        let request = self.attributes.attribute::<ExtensionRequest>()?;
        Ok(request
            .map(|request| {
                request
                    .into_extensions()
                    .into_iter()
                    .map(RawExtension::from)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
            .into())
    }
}

impl DecodableFrom<Element> for CertificationRequestInfo {}

impl Decoder<Element, CertificationRequestInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificationRequestInfo> {
        let Some([version, subject, spki, rest @ ..]) = self.as_sequence() else {
            return Err(Error::InvalidRequest(
                "expected SEQUENCE of version, subject, subjectPKInfo".to_string(),
            ));
        };
        match version {
            Element::Integer(i) if i.to_i64() == Some(0) => {}
            Element::Integer(i) => {
                return Err(Error::UnsupportedVersion(i.as_bigint().to_string()));
            }
            _ => {
                return Err(Error::InvalidRequest(
                    "expected INTEGER for version".to_string(),
                ));
            }
        }
        let subject: Name = subject.decode()?;
        let subject_public_key_info: SubjectPublicKeyInfo = spki.decode()?;
        subject_public_key_info.key_algorithm()?;
        // Some encoders omit an empty attribute set entirely
        let attributes = match rest {
            [] => Attributes::default(),
            [attributes @ Element::ContextSpecific { slot: 0, .. }] => attributes.decode()?,
            _ => {
                return Err(Error::InvalidRequest(
                    "attributes must be [0] IMPLICIT SET OF Attribute".to_string(),
                ));
            }
        };
        Ok(CertificationRequestInfo {
            subject,
            subject_public_key_info,
            attributes,
        })
    }
}

impl EncodableTo<CertificationRequestInfo> for Element {}

impl Encoder<CertificationRequestInfo, Element> for CertificationRequestInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let Element::Set(attributes) = self.attributes.encode()? else {
            return Err(Error::InvalidRequest(
                "attributes did not encode as a SET".to_string(),
            ));
        };
        Ok(Element::Sequence(vec![
            Element::Integer(Integer::from(0u32)),
            self.subject.encode()?,
            self.subject_public_key_info.encode()?,
            Element::ContextSpecific {
                slot: 0,
                elements: attributes,
            },
        ]))
    }
}

/// A parsed PKCS#10 certificate signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    der: Vec<u8>,
    info_der: Vec<u8>,
    info: CertificationRequestInfo,
    signature_algorithm: SignatureAlgorithm,
    signature: Vec<u8>,
}

impl CertificateRequest {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (info_der, algorithm, signature) = split_signed(der).map_err(|e| match e {
            Error::InvalidCertificate(msg) => Error::InvalidRequest(msg),
            other => other,
        })?;
        let info: CertificationRequestInfo = Element::from_der(info_der)?.decode()?;
        Ok(CertificateRequest {
            der: der.to_vec(),
            info_der: info_der.to_vec(),
            info,
            signature_algorithm: signature_algorithm(&algorithm)?,
            signature: signature_bits(&signature)?,
        })
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    pub fn info(&self) -> &CertificationRequestInfo {
        &self.info
    }

    pub fn subject(&self) -> &Name {
        &self.info.subject
    }

    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.info.subject_public_key_info
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_spki(self.subject_public_key_info())?)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.info.attributes
    }

    pub fn requested_extensions(&self) -> Result<Extensions> {
        self.info.requested_extensions()
    }

    /// Get and parse a specific requested extension by type
    pub fn extension<T: Extension>(&self) -> Result<Option<T>> {
        Ok(self.requested_extensions()?.extension::<T>()?)
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Checks the self-signature against the request's own public key.
    pub fn verify(&self) -> Result<bool> {
        let key = self.public_key()?;
        Ok(key.verify(self.signature_algorithm, &self.info_der, &self.signature)?)
    }
}

impl FromPem for CertificateRequest {
    type Error = Error;

    fn expected_label() -> Label {
        Label::CertificateRequest
    }

    /// `NEW CERTIFICATE REQUEST` is folded into the same label by the PEM layer.
    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel {
                expected: Self::expected_label(),
                actual: pem.label(),
            });
        }
        CertificateRequest::from_der(pem.body())
    }
}

impl ToPem for CertificateRequest {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::CertificateRequest
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::new(self.pem_label(), self.der.clone()))
    }
}

impl FromStr for CertificateRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pem = Pem::from_str(s)?;
        CertificateRequest::from_pem(&pem)
    }
}

#[cfg(test)]
mod tests {
    use sslkit::error::{ErrorKind, Kind};
    use sslkit_pkix_types::PublicKeyAlgorithm;

    use super::*;
    use crate::certificate::signed_der;
    use crate::test_fixtures::LEAF_CSR_PEM;

    #[test]
    fn test_parse_openssl_request() {
        let csr = CertificateRequest::from_str(LEAF_CSR_PEM).unwrap();
        assert_eq!(
            "C=US, O=Example Corp, CN=www.example.com",
            csr.subject().to_string()
        );
        assert_eq!(
            PublicKeyAlgorithm::Rsa,
            csr.subject_public_key_info().key_algorithm().unwrap()
        );
        assert_eq!(SignatureAlgorithm::RsaSha256, csr.signature_algorithm());
        assert!(csr.requested_extensions().unwrap().is_empty());
        assert!(csr.verify().unwrap());

        let encoded = csr.info().encode().unwrap().to_der().unwrap();
        assert_eq!(csr.info_der, encoded);
    }

    #[test]
    fn test_tampered_request_does_not_verify() {
        let csr = CertificateRequest::from_str(LEAF_CSR_PEM).unwrap();
        let mut info = csr.info().clone();
        info.subject = "CN=evil.example.com".parse().unwrap();
        let der = signed_der(
            info.encode().unwrap(),
            csr.signature_algorithm(),
            csr.signature().to_vec(),
        )
        .unwrap();
        let tampered = CertificateRequest::from_der(&der).unwrap();
        assert!(!tampered.verify().unwrap());
    }

    #[test]
    fn test_request_version_must_be_zero() {
        let csr = CertificateRequest::from_str(LEAF_CSR_PEM).unwrap();
        let mut info = csr.info().encode().unwrap();
        if let Element::Sequence(elements) = &mut info {
            elements[0] = Element::Integer(Integer::from(1u32));
        }
        let der = signed_der(info, csr.signature_algorithm(), csr.signature().to_vec()).unwrap();
        let err = CertificateRequest::from_der(&der).unwrap_err();
        assert_eq!(ErrorKind::UnsupportedVersion, err.kind());
    }

    #[test]
    fn test_request_malformed() {
        let err = CertificateRequest::from_der(&[0x30, 0x00]).unwrap_err();
        assert_eq!(ErrorKind::MalformedEncoding, err.kind());
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
