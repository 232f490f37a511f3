use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{BitString, Element, Integer};
use sslkit_der::{Tag, read_header, split};
use sslkit_keys::PublicKey;
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkix_types::{
    AlgorithmIdentifier, CertificateSerialNumber, Name, SignatureAlgorithm, SubjectPublicKeyInfo,
};

use crate::error::{Error, Result};
use crate::extensions::{Extension, Extensions};

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1

Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}

TBSCertificate  ::=  SEQUENCE  {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
     extensions      [3]  EXPLICIT Extensions OPTIONAL
}
 */

/// Splits a signed `SEQUENCE { tbs, algorithm, signature }` into the raw
/// encoding of the signed part and the two trailing elements.
///
/// The signed part is kept byte-exact so signatures verify against what was
/// actually signed rather than a re-encoding.
pub(crate) fn split_signed(der: &[u8]) -> Result<(&[u8], Element, Element)> {
    let (tag, contents, rest) = read_header(der)?;
    if tag != Tag::SEQUENCE || !rest.is_empty() {
        return Err(Error::InvalidCertificate(
            "expected a single outer SEQUENCE".to_string(),
        ));
    }
    match split(contents)?.as_slice() {
        [tbs, algorithm, signature] => Ok((
            *tbs,
            Element::from_der(algorithm)?,
            Element::from_der(signature)?,
        )),
        parts => Err(Error::InvalidCertificate(format!(
            "expected 3 elements in signed SEQUENCE, got {}",
            parts.len()
        ))),
    }
}

pub(crate) fn signature_algorithm(element: &Element) -> Result<SignatureAlgorithm> {
    let identifier: AlgorithmIdentifier = element.decode()?;
    Ok(SignatureAlgorithm::try_from(&identifier)?)
}

pub(crate) fn signature_bits(element: &Element) -> Result<Vec<u8>> {
    match element {
        Element::BitString(bits) if bits.unused_bits() == 0 => Ok(bits.as_bytes().to_vec()),
        _ => Err(Error::InvalidCertificate(
            "signatureValue must be a whole-octet BIT STRING".to_string(),
        )),
    }
}

/// Assembles the outer signed SEQUENCE.
pub(crate) fn signed_der(
    tbs: Element,
    algorithm: SignatureAlgorithm,
    signature: Vec<u8>,
) -> Result<Vec<u8>> {
    Ok(Element::Sequence(vec![
        tbs,
        algorithm.to_identifier()?.encode()?,
        Element::BitString(BitString::from_bytes(signature)),
    ])
    .to_der()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (number, hex) = match self {
            Version::V1 => (1, 0),
            Version::V2 => (2, 1),
            Version::V3 => (3, 2),
        };
        write!(f, "{} (0x{:x})", number, hex)
    }
}

impl DecodableFrom<Element> for Version {}

impl Decoder<Element, Version> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Version> {
        match self {
            Element::Integer(i) => match i.to_i64() {
                Some(0) => Ok(Version::V1),
                Some(1) => Ok(Version::V2),
                Some(2) => Ok(Version::V3),
                _ => Err(Error::UnsupportedVersion(i.as_bigint().to_string())),
            },
            _ => Err(Error::InvalidCertificate(
                "expected INTEGER for Version".to_string(),
            )),
        }
    }
}

impl EncodableTo<Version> for Element {}

impl Encoder<Version, Element> for Version {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Integer(Integer::from(*self as u32)))
    }
}

/*
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time
}
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    pub not_before: NaiveDateTime,
    pub not_after: NaiveDateTime,
}

impl Validity {
    /// `days` whole days starting at `not_before`.
    pub fn for_days(not_before: NaiveDateTime, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::InvalidValidityDays(i64::from(days)));
        }
        let not_after = not_before
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or(Error::InvalidValidityDays(i64::from(days)))?;
        Ok(Validity {
            not_before,
            not_after,
        })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.not_before <= at && at <= self.not_after
    }
}

impl DecodableFrom<Element> for Validity {}

impl Decoder<Element, Validity> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Validity> {
        match self.as_sequence() {
            Some([not_before, not_after]) => {
                let not_before = not_before
                    .as_time()
                    .ok_or_else(|| Error::InvalidValidity("invalid notBefore time".to_string()))?;
                let not_after = not_after
                    .as_time()
                    .ok_or_else(|| Error::InvalidValidity("invalid notAfter time".to_string()))?;
                Ok(Validity {
                    not_before,
                    not_after,
                })
            }
            Some(_) => Err(Error::InvalidValidity(
                "expected 2 elements in sequence".to_string(),
            )),
            None => Err(Error::InvalidValidity(
                "expected sequence for Validity".to_string(),
            )),
        }
    }
}

impl EncodableTo<Validity> for Element {}

impl Encoder<Validity, Element> for Validity {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::time(self.not_before),
            Element::time(self.not_after),
        ]))
    }
}

/// The signed portion of a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbsCertificate {
    pub version: Version,
    pub serial_number: CertificateSerialNumber,
    pub signature: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub extensions: Extensions,
}

impl DecodableFrom<Element> for TbsCertificate {}

impl Decoder<Element, TbsCertificate> for Element {
    type Error = Error;

    fn decode(&self) -> Result<TbsCertificate> {
        let elements = self.as_sequence().ok_or_else(|| {
            Error::InvalidCertificate("expected SEQUENCE for TBSCertificate".to_string())
        })?;

        let (version, rest) = match elements {
            [Element::ContextSpecific { slot: 0, elements }, rest @ ..] => match elements.as_slice()
            {
                [version] => (version.decode()?, rest),
                _ => {
                    return Err(Error::InvalidCertificate(
                        "version must be [0] EXPLICIT INTEGER".to_string(),
                    ));
                }
            },
            rest => (Version::V1, rest),
        };

        let [serial, signature, issuer, validity, subject, spki, optional @ ..] = rest else {
            return Err(Error::InvalidCertificate(format!(
                "TBSCertificate has {} elements, expected at least 7",
                elements.len()
            )));
        };

        let serial_number: CertificateSerialNumber = serial.decode()?;
        let signature = crate::certificate::signature_algorithm(signature)?;
        let issuer: Name = issuer.decode()?;
        let validity: Validity = validity.decode()?;
        let subject: Name = subject.decode()?;
        let subject_public_key_info: SubjectPublicKeyInfo = spki.decode()?;
        // Unknown key algorithms are rejected at parse time
        subject_public_key_info.key_algorithm()?;

        let mut extensions = Extensions::new();
        for element in optional {
            match element {
                // issuerUniqueID / subjectUniqueID are accepted and dropped
                Element::Implicit { slot: 1 | 2, .. } if version >= Version::V2 => {}
                Element::ContextSpecific { slot: 3, .. } if version == Version::V3 => {
                    extensions = element.decode()?;
                }
                other => {
                    return Err(Error::InvalidCertificate(format!(
                        "unexpected {} in TBSCertificate for version {}",
                        other.name(),
                        version
                    )));
                }
            }
        }

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            extensions,
        })
    }
}

impl EncodableTo<TbsCertificate> for Element {}

impl Encoder<TbsCertificate, Element> for TbsCertificate {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = Vec::with_capacity(8);
        if self.version != Version::V1 {
            elements.push(Element::explicit(0, self.version.encode()?));
        }
        elements.push(self.serial_number.encode()?);
        elements.push(self.signature.to_identifier()?.encode()?);
        elements.push(self.issuer.encode()?);
        elements.push(self.validity.encode()?);
        elements.push(self.subject.encode()?);
        elements.push(self.subject_public_key_info.encode()?);
        if !self.extensions.is_empty() {
            elements.push(Element::explicit(3, self.extensions.encode()?));
        }
        Ok(Element::Sequence(elements))
    }
}

/// A parsed X.509 certificate.
///
/// The exact DER of the certificate and of its TBSCertificate are kept
/// alongside the decoded fields; encoding returns the original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    tbs_der: Vec<u8>,
    tbs_certificate: TbsCertificate,
    signature_algorithm: SignatureAlgorithm,
    signature: Vec<u8>,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (tbs_der, algorithm, signature) = split_signed(der)?;
        let tbs_certificate: TbsCertificate = Element::from_der(tbs_der)?.decode()?;
        let signature_algorithm = signature_algorithm(&algorithm)?;
        if signature_algorithm != tbs_certificate.signature {
            return Err(Error::InvalidCertificate(format!(
                "signatureAlgorithm {} does not match TBSCertificate signature {}",
                signature_algorithm, tbs_certificate.signature
            )));
        }
        Ok(Certificate {
            der: der.to_vec(),
            tbs_der: tbs_der.to_vec(),
            tbs_certificate,
            signature_algorithm,
            signature: signature_bits(&signature)?,
        })
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    pub fn tbs_der(&self) -> &[u8] {
        &self.tbs_der
    }

    pub fn tbs_certificate(&self) -> &TbsCertificate {
        &self.tbs_certificate
    }

    pub fn version(&self) -> Version {
        self.tbs_certificate.version
    }

    pub fn serial_number(&self) -> &CertificateSerialNumber {
        &self.tbs_certificate.serial_number
    }

    pub fn issuer(&self) -> &Name {
        &self.tbs_certificate.issuer
    }

    pub fn subject(&self) -> &Name {
        &self.tbs_certificate.subject
    }

    pub fn validity(&self) -> &Validity {
        &self.tbs_certificate.validity
    }

    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.tbs_certificate.subject_public_key_info
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_spki(self.subject_public_key_info())?)
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn extensions(&self) -> &Extensions {
        &self.tbs_certificate.extensions
    }

    /// Get and parse a specific extension by type
    pub fn extension<T: Extension>(&self) -> Result<Option<T>> {
        Ok(self.extensions().extension::<T>()?)
    }

    pub fn has_unknown_critical_extensions(&self) -> bool {
        self.extensions().has_unknown_critical()
    }

    /// Issuer and subject are the same DN.
    pub fn is_self_issued(&self) -> bool {
        self.issuer().matches(self.subject())
    }

    /// Self-issued and signed by its own key.
    pub fn is_self_signed(&self) -> bool {
        self.is_self_issued()
            && self
                .public_key()
                .and_then(|key| self.verify_signature(&key))
                .unwrap_or(false)
    }

    /// `Ok(false)` when the signature does not verify; an error when the key
    /// type cannot have produced this signature algorithm.
    pub fn verify_signature(&self, issuer_key: &PublicKey) -> Result<bool> {
        Ok(issuer_key.verify(self.signature_algorithm, &self.tbs_der, &self.signature)?)
    }
}

impl FromPem for Certificate {
    type Error = Error;

    fn expected_label() -> Label {
        Label::Certificate
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel {
                expected: Self::expected_label(),
                actual: pem.label(),
            });
        }
        Certificate::from_der(pem.body())
    }
}

impl ToPem for Certificate {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::Certificate
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::new(self.pem_label(), self.der.clone()))
    }
}

impl FromStr for Certificate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pem = Pem::from_str(s)?;
        Certificate::from_pem(&pem)
    }
}

impl TryFrom<&[u8]> for Certificate {
    type Error = Error;

    fn try_from(der: &[u8]) -> Result<Self> {
        Certificate::from_der(der)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use sslkit::error::{ErrorKind, Kind};
    use sslkit_pkix_types::{NamedCurve, PublicKeyAlgorithm};

    use super::*;
    use crate::extensions::{
        AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName,
        SubjectKeyIdentifier,
    };
    use crate::test_fixtures::{EC_CA_PEM, LEAF_PEM, ROOT_CA_PEM, V1_PEM};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_root_ca() {
        let cert = Certificate::from_str(ROOT_CA_PEM).unwrap();
        assert_eq!(Version::V3, cert.version());
        assert_eq!(SignatureAlgorithm::RsaSha256, cert.signature_algorithm());
        assert_eq!(
            "C=US, O=Example Corp, CN=Example Root CA",
            cert.subject().to_string()
        );
        assert_eq!(
            PublicKeyAlgorithm::Rsa,
            cert.subject_public_key_info().key_algorithm().unwrap()
        );
        assert_eq!(4096, cert.subject_public_key_info().key_bits().unwrap());
        assert!(cert.is_self_signed());
        assert!(!cert.has_unknown_critical_extensions());
        assert_eq!(at(2026, 1, 1), cert.validity().not_before);
        assert_eq!(at(2036, 1, 1), cert.validity().not_after);
        assert!(cert.validity().contains(at(2030, 1, 1)));
        assert!(!cert.validity().contains(at(2025, 1, 1)));

        let bc: BasicConstraints = cert.extension().unwrap().unwrap();
        assert!(bc.ca);
        let ku: KeyUsage = cert.extension().unwrap().unwrap();
        assert!(ku.key_cert_sign && ku.crl_sign && !ku.digital_signature);

        // keyid:always on a self-signed root repeats the subject key identifier
        let ski: SubjectKeyIdentifier = cert.extension().unwrap().unwrap();
        let aki: AuthorityKeyIdentifier = cert.extension().unwrap().unwrap();
        assert_eq!(Some(ski.key_identifier), aki.key_identifier);
    }

    #[test]
    fn test_parse_leaf() {
        let cert = Certificate::from_str(LEAF_PEM).unwrap();
        let root = Certificate::from_str(ROOT_CA_PEM).unwrap();
        assert_eq!("1001", cert.serial_number().format_hex().replace(':', ""));
        assert!(cert.issuer().matches(root.subject()));
        assert!(!cert.is_self_issued());
        assert!(!cert.is_self_signed());
        assert!(
            cert.verify_signature(&root.public_key().unwrap())
                .unwrap()
        );

        let san: SubjectAltName = cert.extension().unwrap().unwrap();
        assert_eq!(
            "DNS:www.example.com, DNS:*.example.com, IP Address:127.0.0.1",
            san.to_string()
        );
        let eku: ExtendedKeyUsage = cert.extension().unwrap().unwrap();
        assert!(eku.contains(ExtendedKeyUsage::SERVER_AUTH));
        assert!(eku.contains(ExtendedKeyUsage::CLIENT_AUTH));
        let bc: BasicConstraints = cert.extension().unwrap().unwrap();
        assert!(!bc.ca);
        assert_eq!(2048, cert.subject_public_key_info().key_bits().unwrap());
    }

    #[test]
    fn test_parse_ecdsa() {
        let cert = Certificate::from_str(EC_CA_PEM).unwrap();
        assert_eq!(
            PublicKeyAlgorithm::Ec(NamedCurve::P256),
            cert.subject_public_key_info().key_algorithm().unwrap()
        );
        assert_eq!(SignatureAlgorithm::EcdsaSha256, cert.signature_algorithm());
        assert!(cert.is_self_signed());
    }

    #[test]
    fn test_parse_v1() {
        let cert = Certificate::from_str(V1_PEM).unwrap();
        assert_eq!(Version::V1, cert.version());
        assert!(cert.extensions().is_empty());
        assert_eq!(Some("legacy.example.com"), cert.subject().common_name());
        assert!(cert.is_self_signed());
    }

    #[rstest]
    #[case(V1_PEM)]
    #[case(ROOT_CA_PEM)]
    #[case(LEAF_PEM)]
    #[case(EC_CA_PEM)]
    fn test_tbs_reencodes_exactly(#[case] pem: &str) {
        let cert = Certificate::from_str(pem).unwrap();
        let encoded = cert.tbs_certificate().encode().unwrap().to_der().unwrap();
        assert_eq!(cert.tbs_der(), encoded.as_slice());
        assert_eq!(cert.to_pem().unwrap().body(), cert.to_der());
    }

    #[rstest]
    #[case(Element::Integer(Integer::from(3u32)))]
    #[case(Element::Integer(Integer::from(-1i64)))]
    fn test_unsupported_version(#[case] input: Element) {
        let result: Result<Version> = input.decode();
        let err = result.unwrap_err();
        assert_eq!(ErrorKind::UnsupportedVersion, err.kind());
    }

    #[test]
    fn test_unsupported_version_in_certificate() {
        let cert = Certificate::from_str(ROOT_CA_PEM).unwrap();
        let mut tbs = cert.tbs_certificate().encode().unwrap();
        if let Element::Sequence(elements) = &mut tbs {
            elements[0] = Element::explicit(0, Element::Integer(Integer::from(5u32)));
        }
        let der = signed_der(tbs, cert.signature_algorithm(), cert.signature().to_vec()).unwrap();
        let err = Certificate::from_der(&der).unwrap_err();
        assert_eq!(ErrorKind::UnsupportedVersion, err.kind());
    }

    #[test]
    fn test_unknown_signature_algorithm() {
        let cert = Certificate::from_str(ROOT_CA_PEM).unwrap();
        // md5WithRSAEncryption
        let md5 = AlgorithmIdentifier::new(
            "1.2.840.113549.1.1.4".parse().unwrap(),
            Some(Element::Null),
        );
        let der = Element::Sequence(vec![
            Element::from_der(cert.tbs_der()).unwrap(),
            md5.encode().unwrap(),
            Element::BitString(BitString::from_bytes(cert.signature().to_vec())),
        ])
        .to_der()
        .unwrap();
        let err = Certificate::from_der(&der).unwrap_err();
        assert_eq!(ErrorKind::UnknownAlgorithm, err.kind());
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::truncated(vec![0x30, 0x82, 0x01])]
    #[case::not_sequence(vec![0x02, 0x01, 0x00])]
    #[case::trailing(vec![0x30, 0x00, 0x00])]
    #[case::short(vec![0x30, 0x03, 0x02, 0x01, 0x00])]
    fn test_malformed(#[case] der: Vec<u8>) {
        let err = Certificate::from_der(&der).unwrap_err();
        assert_eq!(ErrorKind::MalformedEncoding, err.kind());
    }

    #[test]
    fn test_wrong_pem_label() {
        let pem = Pem::new(Label::PublicKey, vec![0x30, 0x00]);
        let err = Certificate::from_pem(&pem).unwrap_err();
        assert_eq!(ErrorKind::InvalidPemFraming, err.kind());
    }

    #[test]
    fn test_validity_for_days() {
        let validity = Validity::for_days(at(2025, 1, 1), 365).unwrap();
        assert_eq!(at(2026, 1, 1), validity.not_after);
        assert!(Validity::for_days(at(2025, 1, 1), 0).is_err());
    }

    #[test]
    fn test_validity_encoding_switches_to_generalized_time() {
        let validity = Validity {
            not_before: at(2049, 1, 1),
            not_after: at(2050, 1, 1),
        };
        let element = validity.encode().unwrap();
        assert!(matches!(
            element.as_sequence(),
            Some([Element::UTCTime(_), Element::GeneralizedTime(_)])
        ));
        let decoded: Validity = element.decode().unwrap();
        assert_eq!(validity, decoded);
    }
}
