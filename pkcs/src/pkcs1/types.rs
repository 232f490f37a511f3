use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use zeroize::Zeroize;

use super::error::{Error, Result};

/*
RFC 8017 - PKCS #1: RSA Cryptography Specifications

RSAPrivateKey ::= SEQUENCE {
    version           Version,
    modulus           INTEGER,  -- n
    publicExponent    INTEGER,  -- e
    privateExponent   INTEGER,  -- d
    prime1            INTEGER,  -- p
    prime2            INTEGER,  -- q
    exponent1         INTEGER,  -- d mod (p-1)
    exponent2         INTEGER,  -- d mod (q-1)
    coefficient       INTEGER,  -- (inverse of q) mod p
    otherPrimeInfos   OtherPrimeInfos OPTIONAL
}

Version ::= INTEGER { two-prime(0), multi(1) }
*/

/// PKCS#1 RSA Private Key structure (two-prime only)
#[derive(Clone, PartialEq, Eq)]
pub struct RSAPrivateKey {
    pub modulus: Integer,          // n
    pub public_exponent: Integer,  // e
    pub private_exponent: Integer, // d
    pub prime1: Integer,           // p
    pub prime2: Integer,           // q
    pub exponent1: Integer,        // d mod (p-1)
    pub exponent2: Integer,        // d mod (q-1)
    pub coefficient: Integer,      // (inverse of q) mod p
}

impl std::fmt::Debug for RSAPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RSAPrivateKey")
            .field("bits", &self.key_size())
            .finish_non_exhaustive()
    }
}

impl RSAPrivateKey {
    pub fn key_size(&self) -> u64 {
        self.modulus.as_bigint().bits()
    }

    pub fn public_key(&self) -> RSAPublicKey {
        RSAPublicKey {
            modulus: self.modulus.clone(),
            public_exponent: self.public_exponent.clone(),
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

fn integer(elements: &[Element], idx: usize, field: &'static str) -> Result<Integer> {
    match elements.get(idx) {
        Some(Element::Integer(int)) => Ok(int.clone()),
        _ => Err(Error::ExpectedInteger { field }),
    }
}

impl DecodableFrom<Element> for RSAPrivateKey {}

impl Decoder<Element, RSAPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        if elements.len() < 9 {
            return Err(Error::InvalidElementCount {
                expected: "9",
                actual: elements.len(),
            });
        }
        match integer(elements, 0, "version")?.to_i64() {
            Some(0) if elements.len() == 9 => {}
            Some(1) => return Err(Error::MultiPrime),
            Some(0) => {
                return Err(Error::InvalidElementCount {
                    expected: "9",
                    actual: elements.len(),
                });
            }
            other => return Err(Error::InvalidVersion(other.unwrap_or(-1))),
        }

        Ok(RSAPrivateKey {
            modulus: integer(elements, 1, "modulus")?,
            public_exponent: integer(elements, 2, "publicExponent")?,
            private_exponent: integer(elements, 3, "privateExponent")?,
            prime1: integer(elements, 4, "prime1")?,
            prime2: integer(elements, 5, "prime2")?,
            exponent1: integer(elements, 6, "exponent1")?,
            exponent2: integer(elements, 7, "exponent2")?,
            coefficient: integer(elements, 8, "coefficient")?,
        })
    }
}

impl EncodableTo<RSAPrivateKey> for Element {}

impl Encoder<RSAPrivateKey, Element> for RSAPrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(Integer::from(0u32)),
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
            Element::Integer(self.private_exponent.clone()),
            Element::Integer(self.prime1.clone()),
            Element::Integer(self.prime2.clone()),
            Element::Integer(self.exponent1.clone()),
            Element::Integer(self.exponent2.clone()),
            Element::Integer(self.coefficient.clone()),
        ]))
    }
}

impl ToPem for RSAPrivateKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::RSAPrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        let mut der = self.to_der()?;
        let pem = Pem::from_bytes(self.pem_label(), &der);
        der.zeroize();
        Ok(pem)
    }
}

impl FromPem for RSAPrivateKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::RSAPrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        Self::from_der(pem.body())
    }
}

/*
RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

/// PKCS#1 RSA Public Key structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPublicKey {
    pub modulus: Integer,         // n
    pub public_exponent: Integer, // e
}

impl RSAPublicKey {
    /// Modulus length in bits
    pub fn key_size(&self) -> u64 {
        self.modulus.as_bigint().bits()
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element = self.encode()?;
        Ok(element.to_der()?)
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        if elements.len() != 2 {
            return Err(Error::InvalidElementCount {
                expected: "2",
                actual: elements.len(),
            });
        }
        Ok(RSAPublicKey {
            modulus: integer(elements, 0, "modulus")?,
            public_exponent: integer(elements, 1, "publicExponent")?,
        })
    }
}

impl EncodableTo<RSAPublicKey> for Element {}

impl Encoder<RSAPublicKey, Element> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
        ]))
    }
}

impl ToPem for RSAPublicKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::RSAPublicKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}
