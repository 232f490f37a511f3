//! AlgorithmIdentifier type
//!
//! Defined in RFC 5280 Section 4.1.1.2
//!
//! ```asn1
//! AlgorithmIdentifier  ::=  SEQUENCE  {
//!     algorithm               OBJECT IDENTIFIER,
//!     parameters              ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```
//!
//! Typed views over the identifiers this toolkit understands: signature
//! algorithms (RFC 4055, RFC 5758), public key algorithms and named curves
//! (RFC 5480) and message digests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, ser::SerializeStruct};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier};

use crate::OidName;
use crate::error::{Error, Result};

/// Algorithm Identifier
///
/// Used throughout X.509 (certificates), PKCS#8 (private keys),
/// PKCS#10 (CSRs), and the PKCS#7/PKCS#12 containers.
///
/// `parameters`:
/// - None: field not present
/// - Some(Element::Null): explicit NULL, as RSA identifiers carry
/// - Some(other): e.g. the curve OID of an EC public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<Element>,
}

impl AlgorithmIdentifier {
    pub fn new(algorithm: ObjectIdentifier, parameters: Option<Element>) -> Self {
        Self {
            algorithm,
            parameters,
        }
    }

    /// Identifier built from a dotted OID literal known at compile time.
    pub(crate) fn from_static(oid: &'static str, parameters: Option<Element>) -> Result<Self> {
        Ok(Self::new(ObjectIdentifier::from_str(oid)?, parameters))
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&Element> {
        self.parameters.as_ref()
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        let oid = self.algorithm.to_string();
        OID_NAMES
            .iter()
            .find(|(o, _)| *o == oid)
            .map(|(_, name)| *name)
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("name", &self.oid_name())?;
        state.end()
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        match self.as_sequence() {
            Some([Element::ObjectIdentifier(oid)]) => Ok(AlgorithmIdentifier::new(oid.clone(), None)),
            Some([Element::ObjectIdentifier(oid), params]) => Ok(AlgorithmIdentifier::new(
                oid.clone(),
                Some(params.clone()),
            )),
            Some(_) => Err(Error::InvalidAlgorithmIdentifier(
                "expected OBJECT IDENTIFIER and optional parameters".to_string(),
            )),
            None => Err(Error::expected("AlgorithmIdentifier", "SEQUENCE")),
        }
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        if let Some(params) = &self.parameters {
            elements.push(params.clone());
        }
        Ok(Element::Sequence(elements))
    }
}

const OID_NAMES: &[(&str, &str)] = &[
    ("1.2.840.113549.1.1.1", "rsaEncryption"),
    ("1.2.840.113549.1.1.4", "md5WithRSAEncryption"),
    ("1.2.840.113549.1.1.5", "sha1WithRSAEncryption"),
    ("1.2.840.113549.1.1.10", "rsassa-pss"),
    ("1.2.840.113549.1.1.11", "sha256WithRSAEncryption"),
    ("1.2.840.113549.1.1.12", "sha384WithRSAEncryption"),
    ("1.2.840.113549.1.1.13", "sha512WithRSAEncryption"),
    ("1.2.840.10045.2.1", "id-ecPublicKey"),
    ("1.2.840.10045.4.1", "ecdsa-with-SHA1"),
    ("1.2.840.10045.4.3.2", "ecdsa-with-SHA256"),
    ("1.2.840.10045.4.3.3", "ecdsa-with-SHA384"),
    ("1.2.840.10045.4.3.4", "ecdsa-with-SHA512"),
    ("1.3.101.112", "Ed25519"),
    ("1.3.14.3.2.26", "sha1"),
    ("2.16.840.1.101.3.4.2.1", "sha256"),
    ("2.16.840.1.101.3.4.2.2", "sha384"),
    ("2.16.840.1.101.3.4.2.3", "sha512"),
    ("1.2.840.113549.1.5.13", "pbes2"),
    ("1.2.840.113549.1.5.12", "pbkdf2"),
    ("2.16.840.1.101.3.4.1.42", "aes256-cbc"),
    ("1.2.840.113549.2.9", "hmacWithSHA256"),
];

/// Message digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn oid(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "1.3.14.3.2.26",
            DigestAlgorithm::Sha256 => "2.16.840.1.101.3.4.2.1",
            DigestAlgorithm::Sha384 => "2.16.840.1.101.3.4.2.2",
            DigestAlgorithm::Sha512 => "2.16.840.1.101.3.4.2.3",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        [
            DigestAlgorithm::Sha1,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ]
        .into_iter()
        .find(|d| *oid == d.oid())
        .ok_or_else(|| Error::UnknownAlgorithm(oid.to_string()))
    }

    /// Parameters are absent (RFC 5754 Section 2).
    pub fn to_identifier(&self) -> Result<AlgorithmIdentifier> {
        AlgorithmIdentifier::from_static(self.oid(), None)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha384" => Ok(DigestAlgorithm::Sha384),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// NIST curves supported for EC keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedCurve {
    P256,
    P384,
    P521,
}

impl NamedCurve {
    pub fn oid(&self) -> &'static str {
        match self {
            NamedCurve::P256 => "1.2.840.10045.3.1.7",
            NamedCurve::P384 => "1.3.132.0.34",
            NamedCurve::P521 => "1.3.132.0.35",
        }
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        [NamedCurve::P256, NamedCurve::P384, NamedCurve::P521]
            .into_iter()
            .find(|c| *oid == c.oid())
            .ok_or_else(|| Error::UnknownCurve(oid.to_string()))
    }

    /// Size of a field element (and of a private scalar) in bytes.
    pub fn field_size(&self) -> usize {
        match self {
            NamedCurve::P256 => 32,
            NamedCurve::P384 => 48,
            NamedCurve::P521 => 66,
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            NamedCurve::P256 => 256,
            NamedCurve::P384 => 384,
            NamedCurve::P521 => 521,
        }
    }

    /// Digest paired with the curve when signing.
    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            NamedCurve::P256 => DigestAlgorithm::Sha256,
            NamedCurve::P384 => DigestAlgorithm::Sha384,
            NamedCurve::P521 => DigestAlgorithm::Sha512,
        }
    }
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamedCurve::P256 => "P-256",
            NamedCurve::P384 => "P-384",
            NamedCurve::P521 => "P-521",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for NamedCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "p-256" | "p256" | "prime256v1" | "secp256r1" => Ok(NamedCurve::P256),
            "p-384" | "p384" | "secp384r1" => Ok(NamedCurve::P384),
            "p-521" | "p521" | "secp521r1" => Ok(NamedCurve::P521),
            _ => Err(Error::UnknownCurve(s.to_string())),
        }
    }
}

const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// Public key algorithm of a SubjectPublicKeyInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PublicKeyAlgorithm {
    Rsa,
    Ec(NamedCurve),
}

impl PublicKeyAlgorithm {
    /// RSA carries NULL parameters, EC the named curve OID.
    pub fn to_identifier(&self) -> Result<AlgorithmIdentifier> {
        match self {
            PublicKeyAlgorithm::Rsa => {
                AlgorithmIdentifier::from_static(RSA_ENCRYPTION, Some(Element::Null))
            }
            PublicKeyAlgorithm::Ec(curve) => AlgorithmIdentifier::from_static(
                EC_PUBLIC_KEY,
                Some(Element::ObjectIdentifier(ObjectIdentifier::from_str(
                    curve.oid(),
                )?)),
            ),
        }
    }
}

impl TryFrom<&AlgorithmIdentifier> for PublicKeyAlgorithm {
    type Error = Error;

    fn try_from(id: &AlgorithmIdentifier) -> Result<Self> {
        if id.algorithm == RSA_ENCRYPTION {
            Ok(PublicKeyAlgorithm::Rsa)
        } else if id.algorithm == EC_PUBLIC_KEY {
            match &id.parameters {
                Some(Element::ObjectIdentifier(curve)) => {
                    Ok(PublicKeyAlgorithm::Ec(NamedCurve::from_oid(curve)?))
                }
                Some(Element::Sequence(_)) => Err(Error::UnknownCurve(
                    "explicit curve parameters".to_string(),
                )),
                _ => Err(Error::InvalidAlgorithmIdentifier(
                    "id-ecPublicKey without a named curve".to_string(),
                )),
            }
        } else {
            Err(Error::UnknownAlgorithm(
                id.oid_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| id.algorithm.to_string()),
            ))
        }
    }
}

impl fmt::Display for PublicKeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKeyAlgorithm::Rsa => write!(f, "RSA"),
            PublicKeyAlgorithm::Ec(curve) => write!(f, "EC {}", curve),
        }
    }
}

/// Signature algorithms: PKCS#1 v1.5 RSA and ECDSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    RsaSha1,
    RsaSha256,
    RsaSha384,
    RsaSha512,
    EcdsaSha1,
    EcdsaSha256,
    EcdsaSha384,
    EcdsaSha512,
}

impl SignatureAlgorithm {
    const ALL: [SignatureAlgorithm; 8] = [
        SignatureAlgorithm::RsaSha1,
        SignatureAlgorithm::RsaSha256,
        SignatureAlgorithm::RsaSha384,
        SignatureAlgorithm::RsaSha512,
        SignatureAlgorithm::EcdsaSha1,
        SignatureAlgorithm::EcdsaSha256,
        SignatureAlgorithm::EcdsaSha384,
        SignatureAlgorithm::EcdsaSha512,
    ];

    pub fn oid(&self) -> &'static str {
        match self {
            SignatureAlgorithm::RsaSha1 => "1.2.840.113549.1.1.5",
            SignatureAlgorithm::RsaSha256 => "1.2.840.113549.1.1.11",
            SignatureAlgorithm::RsaSha384 => "1.2.840.113549.1.1.12",
            SignatureAlgorithm::RsaSha512 => "1.2.840.113549.1.1.13",
            SignatureAlgorithm::EcdsaSha1 => "1.2.840.10045.4.1",
            SignatureAlgorithm::EcdsaSha256 => "1.2.840.10045.4.3.2",
            SignatureAlgorithm::EcdsaSha384 => "1.2.840.10045.4.3.3",
            SignatureAlgorithm::EcdsaSha512 => "1.2.840.10045.4.3.4",
        }
    }

    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::RsaSha1 | SignatureAlgorithm::EcdsaSha1 => DigestAlgorithm::Sha1,
            SignatureAlgorithm::RsaSha256 | SignatureAlgorithm::EcdsaSha256 => {
                DigestAlgorithm::Sha256
            }
            SignatureAlgorithm::RsaSha384 | SignatureAlgorithm::EcdsaSha384 => {
                DigestAlgorithm::Sha384
            }
            SignatureAlgorithm::RsaSha512 | SignatureAlgorithm::EcdsaSha512 => {
                DigestAlgorithm::Sha512
            }
        }
    }

    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::RsaSha1
                | SignatureAlgorithm::RsaSha256
                | SignatureAlgorithm::RsaSha384
                | SignatureAlgorithm::RsaSha512
        )
    }

    /// The algorithm a key of the given type signs with: SHA-256 for RSA,
    /// the curve's paired digest for ECDSA.
    pub fn for_key(key: &PublicKeyAlgorithm) -> Self {
        match key {
            PublicKeyAlgorithm::Rsa => SignatureAlgorithm::RsaSha256,
            PublicKeyAlgorithm::Ec(NamedCurve::P256) => SignatureAlgorithm::EcdsaSha256,
            PublicKeyAlgorithm::Ec(NamedCurve::P384) => SignatureAlgorithm::EcdsaSha384,
            PublicKeyAlgorithm::Ec(NamedCurve::P521) => SignatureAlgorithm::EcdsaSha512,
        }
    }

    /// RSA identifiers carry NULL parameters (RFC 4055), ECDSA ones omit
    /// them (RFC 5758 Section 3.2).
    pub fn to_identifier(&self) -> Result<AlgorithmIdentifier> {
        let params = self.is_rsa().then_some(Element::Null);
        AlgorithmIdentifier::from_static(self.oid(), params)
    }
}

impl TryFrom<&AlgorithmIdentifier> for SignatureAlgorithm {
    type Error = Error;

    fn try_from(id: &AlgorithmIdentifier) -> Result<Self> {
        SignatureAlgorithm::ALL
            .into_iter()
            .find(|alg| id.algorithm == alg.oid())
            .ok_or_else(|| {
                Error::UnknownAlgorithm(
                    id.oid_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| id.algorithm.to_string()),
                )
            })
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureAlgorithm::RsaSha1 => "sha1WithRSAEncryption",
            SignatureAlgorithm::RsaSha256 => "sha256WithRSAEncryption",
            SignatureAlgorithm::RsaSha384 => "sha384WithRSAEncryption",
            SignatureAlgorithm::RsaSha512 => "sha512WithRSAEncryption",
            SignatureAlgorithm::EcdsaSha1 => "ecdsa-with-SHA1",
            SignatureAlgorithm::EcdsaSha256 => "ecdsa-with-SHA256",
            SignatureAlgorithm::EcdsaSha384 => "ecdsa-with-SHA384",
            SignatureAlgorithm::EcdsaSha512 => "ecdsa-with-SHA512",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SignatureAlgorithm::RsaSha256, "300d06092a864886f70d01010b0500")]
    #[case(SignatureAlgorithm::EcdsaSha256, "300a06082a8648ce3d040302")]
    #[case(SignatureAlgorithm::EcdsaSha384, "300a06082a8648ce3d040303")]
    fn test_signature_identifier_der(#[case] alg: SignatureAlgorithm, #[case] hex: &str) {
        let id = alg.to_identifier().unwrap();
        let element: Element = id.encode().unwrap();
        let der = element.to_der().unwrap();
        let got = der.iter().map(|b| format!("{:02x}", b)).collect::<String>();
        assert_eq!(hex, got);

        let decoded: AlgorithmIdentifier = element.decode().unwrap();
        assert_eq!(alg, SignatureAlgorithm::try_from(&decoded).unwrap());
    }

    #[rstest]
    #[case(PublicKeyAlgorithm::Rsa)]
    #[case(PublicKeyAlgorithm::Ec(NamedCurve::P256))]
    #[case(PublicKeyAlgorithm::Ec(NamedCurve::P384))]
    #[case(PublicKeyAlgorithm::Ec(NamedCurve::P521))]
    fn test_public_key_algorithm_identifier(#[case] alg: PublicKeyAlgorithm) {
        let id = alg.to_identifier().unwrap();
        assert_eq!(alg, PublicKeyAlgorithm::try_from(&id).unwrap());
    }

    #[test]
    fn test_unknown_signature_algorithm() {
        let md5 = AlgorithmIdentifier::from_static("1.2.840.113549.1.1.4", Some(Element::Null))
            .unwrap();
        let err = SignatureAlgorithm::try_from(&md5).unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(name) if name == "md5WithRSAEncryption"));
    }

    #[test]
    fn test_unknown_curve() {
        let id = AlgorithmIdentifier::from_static(
            EC_PUBLIC_KEY,
            Some(Element::ObjectIdentifier("1.3.132.0.10".parse().unwrap())),
        )
        .unwrap();
        assert!(matches!(
            PublicKeyAlgorithm::try_from(&id),
            Err(Error::UnknownCurve(_))
        ));
    }

    #[rstest]
    #[case("sha256", DigestAlgorithm::Sha256)]
    #[case("SHA-384", DigestAlgorithm::Sha384)]
    #[case("Sha1", DigestAlgorithm::Sha1)]
    fn test_digest_from_str(#[case] input: &str, #[case] expected: DigestAlgorithm) {
        assert_eq!(expected, input.parse().unwrap());
    }

    #[test]
    fn test_signature_for_key() {
        assert_eq!(
            SignatureAlgorithm::EcdsaSha512,
            SignatureAlgorithm::for_key(&PublicKeyAlgorithm::Ec(NamedCurve::P521))
        );
        assert_eq!(
            DigestAlgorithm::Sha384,
            SignatureAlgorithm::for_key(&PublicKeyAlgorithm::Ec(NamedCurve::P384)).digest()
        );
    }
}
