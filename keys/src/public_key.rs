use std::fmt;

use ecdsa::signature::hazmat::PrehashVerifier;
use num_bigint::BigUint;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use sslkit_asn1::{BitString, Integer};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkcs::pkcs1::RSAPublicKey;
use sslkit_pkix_types::{
    DigestAlgorithm, NamedCurve, PublicKeyAlgorithm, SignatureAlgorithm, SubjectPublicKeyInfo,
};

use crate::digest::digest;
use crate::error::{Error, Result};

// Verification accepts moduli beyond the generator's 4096-bit ceiling.
const MAX_VERIFY_MODULUS_BITS: usize = 16384;

pub(crate) fn rsa_padding(digest: DigestAlgorithm) -> Pkcs1v15Sign {
    match digest {
        DigestAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

pub(crate) fn to_rsa_uint(value: &Integer) -> Result<rsa::BigUint> {
    let bytes = value
        .to_unsigned_bytes()
        .ok_or(Error::InvalidKey("negative RSA component"))?;
    Ok(rsa::BigUint::from_bytes_be(&bytes))
}

pub(crate) fn from_rsa_uint(value: &rsa::BigUint) -> BigUint {
    BigUint::from_bytes_be(&value.to_bytes_be())
}

/// Normalizes a SEC1 point to its uncompressed form, rejecting points that
/// are not on the curve.
fn uncompressed_point(curve: NamedCurve, point: &[u8]) -> Result<Vec<u8>> {
    let point = match curve {
        NamedCurve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(point)?
            .to_encoded_point(false)
            .as_bytes()
            .to_vec(),
        NamedCurve::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(point)?
            .to_encoded_point(false)
            .as_bytes()
            .to_vec(),
        NamedCurve::P521 => p521::ecdsa::VerifyingKey::from_sec1_bytes(point)?
            .to_encoded_point(false)
            .as_bytes()
            .to_vec(),
    };
    Ok(point)
}

fn verify_ecdsa(curve: NamedCurve, point: &[u8], prehash: &[u8], signature: &[u8]) -> bool {
    match curve {
        NamedCurve::P256 => {
            let (Ok(key), Ok(signature)) = (
                p256::ecdsa::VerifyingKey::from_sec1_bytes(point),
                p256::ecdsa::Signature::from_der(signature),
            ) else {
                return false;
            };
            key.verify_prehash(prehash, &signature).is_ok()
        }
        NamedCurve::P384 => {
            let (Ok(key), Ok(signature)) = (
                p384::ecdsa::VerifyingKey::from_sec1_bytes(point),
                p384::ecdsa::Signature::from_der(signature),
            ) else {
                return false;
            };
            key.verify_prehash(prehash, &signature).is_ok()
        }
        NamedCurve::P521 => {
            let (Ok(key), Ok(signature)) = (
                p521::ecdsa::VerifyingKey::from_sec1_bytes(point),
                p521::ecdsa::Signature::from_der(signature),
            ) else {
                return false;
            };
            key.verify_prehash(prehash, &signature).is_ok()
        }
    }
}

/// An RSA or EC public key that can check signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    /// Uncompressed SEC1 point
    Ec { curve: NamedCurve, point: Vec<u8> },
}

impl PublicKey {
    pub fn from_spki(spki: &SubjectPublicKeyInfo) -> Result<Self> {
        let key = spki.subject_public_key().as_bytes();
        match spki.key_algorithm()? {
            PublicKeyAlgorithm::Rsa => Self::from_pkcs1(&RSAPublicKey::from_der(key)?),
            PublicKeyAlgorithm::Ec(curve) => Self::from_sec1_point(curve, key),
        }
    }

    pub fn from_pkcs1(key: &RSAPublicKey) -> Result<Self> {
        let key = RsaPublicKey::new_with_max_size(
            to_rsa_uint(&key.modulus)?,
            to_rsa_uint(&key.public_exponent)?,
            MAX_VERIFY_MODULUS_BITS,
        )?;
        Ok(PublicKey::Rsa(key))
    }

    pub fn from_sec1_point(curve: NamedCurve, point: &[u8]) -> Result<Self> {
        Ok(PublicKey::Ec {
            curve,
            point: uncompressed_point(curve, point)?,
        })
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match self {
            PublicKey::Rsa(_) => PublicKeyAlgorithm::Rsa,
            PublicKey::Ec { curve, .. } => PublicKeyAlgorithm::Ec(*curve),
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            PublicKey::Rsa(key) => key.n().bits(),
            PublicKey::Ec { curve, .. } => curve.bits(),
        }
    }

    pub fn to_pkcs1(&self) -> Result<RSAPublicKey> {
        match self {
            PublicKey::Rsa(key) => Ok(RSAPublicKey {
                modulus: Integer::from(from_rsa_uint(key.n())),
                public_exponent: Integer::from(from_rsa_uint(key.e())),
            }),
            PublicKey::Ec { .. } => Err(Error::InvalidKey("not an RSA key")),
        }
    }

    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfo> {
        let key = match self {
            PublicKey::Rsa(_) => self.to_pkcs1()?.to_der()?,
            PublicKey::Ec { point, .. } => point.clone(),
        };
        Ok(SubjectPublicKeyInfo::new(
            self.algorithm().to_identifier()?,
            BitString::from_bytes(key),
        ))
    }

    /// `Ok(false)` for a signature that does not verify; an error only when
    /// the algorithm does not fit the key.
    pub fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        let prehash = digest(algorithm.digest(), data);
        match self {
            PublicKey::Rsa(key) if algorithm.is_rsa() => Ok(key
                .verify(rsa_padding(algorithm.digest()), &prehash, signature)
                .is_ok()),
            PublicKey::Ec { curve, point } if !algorithm.is_rsa() => {
                Ok(verify_ecdsa(*curve, point, &prehash, signature))
            }
            _ => Err(Error::AlgorithmMismatch {
                algorithm,
                key: self.algorithm(),
            }),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::Rsa(_) => write!(f, "RSA {} bits", self.bits()),
            PublicKey::Ec { curve, .. } => write!(f, "EC {}", curve),
        }
    }
}

impl ToPem for PublicKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::PublicKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_spki()?.to_der()?))
    }
}

/// `PUBLIC KEY` blocks, and PKCS#1 `RSA PUBLIC KEY` blocks.
impl FromPem for PublicKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::PublicKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        match pem.label() {
            Label::PublicKey => Self::from_spki(&SubjectPublicKeyInfo::from_der(pem.body())?),
            Label::RSAPublicKey => Self::from_pkcs1(&RSAPublicKey::from_der(pem.body())?),
            label => Err(Error::UnexpectedLabel(label)),
        }
    }
}
