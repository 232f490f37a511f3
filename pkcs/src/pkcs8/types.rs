use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{BitString, Element, Integer, OctetString};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkix_types::{AlgorithmIdentifier, NamedCurve, PublicKeyAlgorithm};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{Error, Result};
use crate::pkcs1::RSAPrivateKey;
use crate::pkcs9::Attributes;
use crate::sec1::ECPrivateKey;

/*
RFC 5958 - Asymmetric Key Packages

OneAsymmetricKey ::= SEQUENCE {
    version                   Version,
    privateKeyAlgorithm       PrivateKeyAlgorithmIdentifier,
    privateKey                PrivateKey,
    attributes            [0] Attributes OPTIONAL,
    ...,
    [[2: publicKey        [1] PublicKey OPTIONAL ]],
    ...
}

PrivateKeyInfo ::= OneAsymmetricKey

Version ::= INTEGER { v1(0), v2(1) } (v1, ..., v2)
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1 = 0,
    V2 = 1,
}

impl TryFrom<i64> for Version {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            _ => Err(Error::InvalidVersion(value)),
        }
    }
}

/// PKCS#8 PrivateKeyInfo (OneAsymmetricKey)
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyInfo {
    #[zeroize(skip)]
    version: Version,
    #[zeroize(skip)]
    algorithm: AlgorithmIdentifier,
    /// DER of the algorithm-specific key (RSAPrivateKey, ECPrivateKey)
    private_key: Vec<u8>,
    #[zeroize(skip)]
    attributes: Option<Attributes>,
    #[zeroize(skip)]
    public_key: Option<BitString>,
}

impl std::fmt::Debug for PrivateKeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyInfo")
            .field("version", &self.version)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl PrivateKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, private_key: Vec<u8>) -> Self {
        PrivateKeyInfo {
            version: Version::V1,
            algorithm,
            private_key,
            attributes: None,
            public_key: None,
        }
    }

    /// Wraps a PKCS#1 key (`rsaEncryption` with NULL parameters).
    pub fn from_pkcs1(key: &RSAPrivateKey) -> Result<Self> {
        Ok(Self::new(
            PublicKeyAlgorithm::Rsa.to_identifier()?,
            key.to_der()?,
        ))
    }

    /// Wraps a SEC1 key. The curve moves to the algorithm parameters, so the
    /// key must name one.
    pub fn from_sec1(key: &ECPrivateKey) -> Result<Self> {
        let curve = key
            .parameters
            .ok_or(Error::InvalidStructure("ECPrivateKey without named curve"))?;
        Ok(Self::new(
            PublicKeyAlgorithm::Ec(curve).to_identifier()?,
            key.to_der()?,
        ))
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn key_algorithm(&self) -> Result<PublicKeyAlgorithm> {
        Ok(PublicKeyAlgorithm::try_from(&self.algorithm)?)
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    pub fn public_key(&self) -> Option<&BitString> {
        self.public_key.as_ref()
    }

    pub fn to_pkcs1(&self) -> Result<RSAPrivateKey> {
        match self.key_algorithm()? {
            PublicKeyAlgorithm::Rsa => Ok(RSAPrivateKey::from_der(&self.private_key)?),
            PublicKeyAlgorithm::Ec(_) => Err(Error::InvalidStructure("not an RSA key")),
        }
    }

    /// The curve from the algorithm parameters fills in omitted SEC1
    /// parameters.
    pub fn to_sec1(&self) -> Result<(NamedCurve, ECPrivateKey)> {
        match self.key_algorithm()? {
            PublicKeyAlgorithm::Ec(curve) => {
                let mut key = ECPrivateKey::from_der(&self.private_key)?;
                if key.parameters.is_none() {
                    key.parameters = Some(curve);
                }
                Ok((curve, key))
            }
            PublicKeyAlgorithm::Rsa => Err(Error::InvalidStructure("not an EC key")),
        }
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element = self.encode()?;
        Ok(element.to_der()?)
    }
}

impl DecodableFrom<Element> for PrivateKeyInfo {}

impl Decoder<Element, PrivateKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<PrivateKeyInfo> {
        let Element::Sequence(elements) = self else {
            return Err(Error::InvalidStructure("PrivateKeyInfo must be a SEQUENCE"));
        };
        let mut iter = elements.iter();

        let version = match iter.next() {
            Some(Element::Integer(v)) => Version::try_from(v.to_i64().unwrap_or(-1))?,
            _ => return Err(Error::InvalidStructure("missing version")),
        };
        let algorithm: AlgorithmIdentifier = match iter.next() {
            Some(element) => element.decode()?,
            None => return Err(Error::InvalidStructure("missing privateKeyAlgorithm")),
        };
        let private_key = match iter.next() {
            Some(Element::OctetString(key)) => key.as_bytes().to_vec(),
            _ => return Err(Error::InvalidStructure("privateKey must be an OCTET STRING")),
        };

        let mut attributes = None;
        let mut public_key = None;
        for element in iter {
            match element {
                Element::ContextSpecific { slot: 0, .. } => attributes = Some(element.decode()?),
                Element::Implicit { slot: 1, data } if version == Version::V2 => {
                    public_key = Some(BitString::try_from(data.as_slice())?);
                }
                _ => return Err(Error::InvalidStructure("unexpected trailing element")),
            }
        }

        Ok(PrivateKeyInfo {
            version,
            algorithm,
            private_key,
            attributes,
            public_key,
        })
    }
}

impl EncodableTo<PrivateKeyInfo> for Element {}

impl Encoder<PrivateKeyInfo, Element> for PrivateKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(Integer::from(self.version as u32)),
            self.algorithm.encode()?,
            Element::OctetString(OctetString::from(self.private_key.as_slice())),
        ];
        if let Some(attributes) = &self.attributes {
            elements.push(Element::ContextSpecific {
                slot: 0,
                elements: attributes.to_elements()?,
            });
        }
        if let Some(public_key) = &self.public_key {
            let mut data = vec![public_key.unused_bits()];
            data.extend_from_slice(public_key.as_bytes());
            elements.push(Element::Implicit { slot: 1, data });
        }
        Ok(Element::Sequence(elements))
    }
}

impl ToPem for PrivateKeyInfo {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::PrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        let mut der = self.to_der()?;
        let pem = Pem::from_bytes(self.pem_label(), &der);
        der.zeroize();
        Ok(pem)
    }
}

impl FromPem for PrivateKeyInfo {
    type Error = Error;

    fn expected_label() -> Label {
        Label::PrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        Self::from_der(pem.body())
    }
}
