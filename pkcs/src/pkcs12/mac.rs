//! ```asn1
//! MacData ::= SEQUENCE {
//!     mac        DigestInfo,
//!     macSalt    OCTET STRING,
//!     iterations INTEGER DEFAULT 1
//! }
//!
//! DigestInfo ::= SEQUENCE {
//!     digestAlgorithm DigestAlgorithmIdentifier,
//!     digest          OCTET STRING
//! }
//! ```

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer, OctetString};
use sslkit_pkix_types::{AlgorithmIdentifier, DigestAlgorithm};

use super::error::{Error, Result};
use super::kdf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacData {
    digest: DigestAlgorithm,
    mac: Vec<u8>,
    salt: Vec<u8>,
    iterations: u32,
}

/// HMAC keyed with the RFC 7292 Appendix B MAC key.
enum KeyedMac {
    Sha1(Hmac<Sha1>),
    Sha256(Hmac<Sha256>),
}

impl KeyedMac {
    fn new(digest: DigestAlgorithm, password: &str, salt: &[u8], iterations: u32) -> Result<Self> {
        let password = kdf::bmp_password(password);
        let invalid = |_| Error::InvalidStructure("MAC key length");
        match digest {
            DigestAlgorithm::Sha1 => {
                let key = kdf::derive::<Sha1>(&password, salt, kdf::ID_MAC, iterations, 20);
                Ok(KeyedMac::Sha1(Hmac::new_from_slice(&key).map_err(invalid)?))
            }
            DigestAlgorithm::Sha256 => {
                let key = kdf::derive::<Sha256>(&password, salt, kdf::ID_MAC, iterations, 32);
                Ok(KeyedMac::Sha256(Hmac::new_from_slice(&key).map_err(invalid)?))
            }
            other => Err(Error::UnsupportedMac(other.to_string())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            KeyedMac::Sha1(mac) => mac.update(data),
            KeyedMac::Sha256(mac) => mac.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            KeyedMac::Sha1(mac) => mac.finalize().into_bytes().to_vec(),
            KeyedMac::Sha256(mac) => mac.finalize().into_bytes().to_vec(),
        }
    }

    /// Constant-time comparison against `tag`.
    fn verify(self, tag: &[u8]) -> Result<()> {
        match self {
            KeyedMac::Sha1(mac) => mac.verify_slice(tag),
            KeyedMac::Sha256(mac) => mac.verify_slice(tag),
        }
        .map_err(|_| Error::IncorrectPassword)
    }
}

impl MacData {
    /// HMAC-SHA256 over `data` keyed from the password.
    pub fn compute(data: &[u8], password: &str, salt: Vec<u8>, iterations: u32) -> Result<Self> {
        let mut keyed = KeyedMac::new(DigestAlgorithm::Sha256, password, &salt, iterations)?;
        keyed.update(data);
        let mac = keyed.finalize();
        Ok(MacData {
            digest: DigestAlgorithm::Sha256,
            mac,
            salt,
            iterations,
        })
    }

    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// A mismatch means the password is wrong or the data was altered.
    pub fn verify(&self, data: &[u8], password: &str) -> Result<()> {
        let mut keyed = KeyedMac::new(self.digest, password, &self.salt, self.iterations)?;
        keyed.update(data);
        keyed.verify(&self.mac)
    }
}

impl DecodableFrom<Element> for MacData {}

impl Decoder<Element, MacData> for Element {
    type Error = Error;

    fn decode(&self) -> Result<MacData> {
        let (digest_info, salt, iterations) = match self.as_sequence() {
            Some([digest_info, Element::OctetString(salt)]) => (digest_info, salt, 1),
            Some([digest_info, Element::OctetString(salt), Element::Integer(iterations)]) => {
                let iterations = iterations
                    .to_u32()
                    .ok_or(Error::InvalidStructure("MAC iteration count out of range"))?;
                (digest_info, salt, iterations)
            }
            _ => return Err(Error::InvalidStructure("MacData must be a SEQUENCE")),
        };
        let (algorithm, mac) = match digest_info.as_sequence() {
            Some([algorithm, Element::OctetString(mac)]) => (algorithm, mac),
            _ => return Err(Error::InvalidStructure("DigestInfo must be a SEQUENCE")),
        };
        let algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let digest = DigestAlgorithm::from_oid(&algorithm.algorithm)
            .map_err(|_| Error::UnsupportedMac(algorithm.algorithm.to_string()))?;
        Ok(MacData {
            digest,
            mac: mac.as_bytes().to_vec(),
            salt: salt.as_bytes().to_vec(),
            iterations,
        })
    }
}

impl EncodableTo<MacData> for Element {}

impl Encoder<MacData, Element> for MacData {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let digest_info = Element::Sequence(vec![
            self.digest.to_identifier()?.encode()?,
            Element::OctetString(OctetString::from(self.mac.clone())),
        ]);
        let mut elements = vec![
            digest_info,
            Element::OctetString(OctetString::from(self.salt.clone())),
        ];
        if self.iterations != 1 {
            elements.push(Element::Integer(Integer::from(self.iterations)));
        }
        Ok(Element::Sequence(elements))
    }
}
