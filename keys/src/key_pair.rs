use std::fmt;

use ecdsa::signature::hazmat::PrehashSigner;
use rsa::RsaPrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use sslkit_asn1::{BitString, Integer};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkcs::pkcs1::RSAPrivateKey;
use sslkit_pkcs::pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo};
use sslkit_pkcs::sec1::ECPrivateKey;
use sslkit_pkix_types::{NamedCurve, PublicKeyAlgorithm, SignatureAlgorithm, SubjectPublicKeyInfo};
use zeroize::Zeroizing;

use crate::digest::digest;
use crate::error::{Error, Result};
use crate::public_key::{PublicKey, from_rsa_uint, rsa_padding, to_rsa_uint};

pub(crate) enum EcSigningKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

impl EcSigningKey {
    /// Fails unless the scalar is in `[1, order - 1]`.
    pub(crate) fn from_scalar(curve: NamedCurve, scalar: &[u8]) -> Result<Self> {
        let key = match curve {
            NamedCurve::P256 => {
                EcSigningKey::P256(p256::ecdsa::SigningKey::from_slice(scalar)?)
            }
            NamedCurve::P384 => {
                EcSigningKey::P384(p384::ecdsa::SigningKey::from_slice(scalar)?)
            }
            NamedCurve::P521 => {
                EcSigningKey::P521(p521::ecdsa::SigningKey::from_slice(scalar)?)
            }
        };
        Ok(key)
    }

    fn curve(&self) -> NamedCurve {
        match self {
            EcSigningKey::P256(_) => NamedCurve::P256,
            EcSigningKey::P384(_) => NamedCurve::P384,
            EcSigningKey::P521(_) => NamedCurve::P521,
        }
    }

    fn scalar(&self) -> Zeroizing<Vec<u8>> {
        let bytes = match self {
            EcSigningKey::P256(key) => key.to_bytes().to_vec(),
            EcSigningKey::P384(key) => key.to_bytes().to_vec(),
            EcSigningKey::P521(key) => key.to_bytes().to_vec(),
        };
        Zeroizing::new(bytes)
    }

    /// Uncompressed SEC1 point
    fn public_point(&self) -> Vec<u8> {
        match self {
            EcSigningKey::P256(key) => {
                key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
            }
            EcSigningKey::P384(key) => {
                key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
            }
            EcSigningKey::P521(key) => {
                p521::ecdsa::VerifyingKey::from(key)
                    .to_encoded_point(false)
                    .as_bytes()
                    .to_vec()
            }
        }
    }

    /// DER-encoded ECDSA signature over a precomputed digest.
    fn sign_prehash(&self, prehash: &[u8]) -> Result<Vec<u8>> {
        let der = match self {
            EcSigningKey::P256(key) => {
                let signature: p256::ecdsa::Signature = key.sign_prehash(prehash)?;
                signature.to_der().as_bytes().to_vec()
            }
            EcSigningKey::P384(key) => {
                let signature: p384::ecdsa::Signature = key.sign_prehash(prehash)?;
                signature.to_der().as_bytes().to_vec()
            }
            EcSigningKey::P521(key) => {
                let signature: p521::ecdsa::Signature = key.sign_prehash(prehash)?;
                signature.to_der().as_bytes().to_vec()
            }
        };
        Ok(der)
    }
}

enum Inner {
    Rsa(Box<RsaPrivateKey>),
    Ec(EcSigningKey),
}

/// A private key with its public half.
pub struct KeyPair {
    inner: Inner,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    pub(crate) fn from_rsa(key: RsaPrivateKey) -> Self {
        KeyPair {
            inner: Inner::Rsa(Box::new(key)),
        }
    }

    pub(crate) fn from_ec(key: EcSigningKey) -> Self {
        KeyPair {
            inner: Inner::Ec(key),
        }
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match &self.inner {
            Inner::Rsa(_) => PublicKeyAlgorithm::Rsa,
            Inner::Ec(key) => PublicKeyAlgorithm::Ec(key.curve()),
        }
    }

    pub fn bits(&self) -> usize {
        match &self.inner {
            Inner::Rsa(key) => key.n().bits(),
            Inner::Ec(key) => key.curve().bits(),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match &self.inner {
            Inner::Rsa(key) => PublicKey::Rsa(key.to_public_key()),
            Inner::Ec(key) => PublicKey::Ec {
                curve: key.curve(),
                point: key.public_point(),
            },
        }
    }

    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfo> {
        self.public_key().to_spki()
    }

    /// Default algorithm for this key: SHA-256 for RSA, the curve's paired
    /// digest for ECDSA.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::for_key(&self.algorithm())
    }

    pub fn sign(&self, algorithm: SignatureAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        let prehash = digest(algorithm.digest(), data);
        match &self.inner {
            Inner::Rsa(key) if algorithm.is_rsa() => {
                Ok(key.sign(rsa_padding(algorithm.digest()), &prehash)?)
            }
            Inner::Ec(key) if !algorithm.is_rsa() => key.sign_prehash(&prehash),
            _ => Err(Error::AlgorithmMismatch {
                algorithm,
                key: self.algorithm(),
            }),
        }
    }

    pub fn from_pkcs1(key: &RSAPrivateKey) -> Result<Self> {
        let key = RsaPrivateKey::from_components(
            to_rsa_uint(&key.modulus)?,
            to_rsa_uint(&key.public_exponent)?,
            to_rsa_uint(&key.private_exponent)?,
            vec![to_rsa_uint(&key.prime1)?, to_rsa_uint(&key.prime2)?],
        )?;
        key.validate()?;
        Ok(KeyPair::from_rsa(key))
    }

    pub fn from_sec1(key: &ECPrivateKey) -> Result<Self> {
        let curve = key.parameters.ok_or(Error::MissingCurve)?;
        let signing_key = EcSigningKey::from_scalar(curve, key.private_key())?;
        if let Some(public_key) = &key.public_key {
            if PublicKey::from_sec1_point(curve, public_key.as_bytes())?
                != PublicKey::from_sec1_point(curve, &signing_key.public_point())?
            {
                return Err(Error::InconsistentKey);
            }
        }
        Ok(KeyPair::from_ec(signing_key))
    }

    pub fn from_pkcs8(key: &PrivateKeyInfo) -> Result<Self> {
        match key.key_algorithm()? {
            PublicKeyAlgorithm::Rsa => Self::from_pkcs1(&key.to_pkcs1()?),
            PublicKeyAlgorithm::Ec(_) => Self::from_sec1(&key.to_sec1()?.1),
        }
    }

    /// Unencrypted private key DER in PKCS#8, PKCS#1 or SEC1 form.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        if let Ok(key) = PrivateKeyInfo::from_der(der) {
            return Self::from_pkcs8(&key);
        }
        if let Ok(key) = RSAPrivateKey::from_der(der) {
            return Self::from_pkcs1(&key);
        }
        if let Ok(key) = ECPrivateKey::from_der(der) {
            return Self::from_sec1(&key);
        }
        Err(Error::UnrecognizedKey)
    }

    /// `PRIVATE KEY`, `RSA PRIVATE KEY`, `EC PRIVATE KEY` or, with a password,
    /// `ENCRYPTED PRIVATE KEY`.
    pub fn from_pem(pem: &Pem, password: Option<&str>) -> Result<Self> {
        if pem.is_legacy_encrypted() {
            return Err(Error::LegacyEncryption);
        }
        match pem.label() {
            Label::PrivateKey => Self::from_pkcs8(&PrivateKeyInfo::from_pem(pem)?),
            Label::RSAPrivateKey => Self::from_pkcs1(&RSAPrivateKey::from_pem(pem)?),
            Label::ECPrivateKey => Self::from_sec1(&ECPrivateKey::from_pem(pem)?),
            Label::EncryptedPrivateKey => {
                let password = password
                    .filter(|p| !p.is_empty())
                    .ok_or(Error::PasswordRequired)?;
                let encrypted = EncryptedPrivateKeyInfo::from_pem(pem)?;
                Self::from_pkcs8(&encrypted.decrypt_key(password.as_bytes())?)
            }
            label => Err(Error::UnexpectedLabel(label)),
        }
    }

    pub fn from_pem_str(text: &str, password: Option<&str>) -> Result<Self> {
        Self::from_pem(&text.parse::<Pem>()?, password)
    }

    pub fn to_pkcs1(&self) -> Result<RSAPrivateKey> {
        let Inner::Rsa(key) = &self.inner else {
            return Err(Error::InvalidKey("not an RSA key"));
        };
        let [p, q] = key.primes() else {
            return Err(Error::InvalidKey("multi-prime RSA key"));
        };
        let d = from_rsa_uint(key.d());
        let p = from_rsa_uint(p);
        let q = from_rsa_uint(q);
        let coefficient = q
            .modinv(&p)
            .ok_or(Error::InvalidKey("primes are not coprime"))?;
        Ok(RSAPrivateKey {
            modulus: Integer::from(from_rsa_uint(key.n())),
            public_exponent: Integer::from(from_rsa_uint(key.e())),
            exponent1: Integer::from(&d % (&p - 1u32)),
            exponent2: Integer::from(&d % (&q - 1u32)),
            private_exponent: Integer::from(d),
            prime1: Integer::from(p),
            prime2: Integer::from(q),
            coefficient: Integer::from(coefficient),
        })
    }

    pub fn to_sec1(&self) -> Result<ECPrivateKey> {
        let Inner::Ec(key) = &self.inner else {
            return Err(Error::InvalidKey("not an EC key"));
        };
        Ok(ECPrivateKey::new(
            key.scalar().to_vec(),
            Some(key.curve()),
            Some(BitString::from_bytes(key.public_point())),
        ))
    }

    pub fn to_pkcs8(&self) -> Result<PrivateKeyInfo> {
        let key = match &self.inner {
            Inner::Rsa(_) => PrivateKeyInfo::from_pkcs1(&self.to_pkcs1()?)?,
            Inner::Ec(_) => PrivateKeyInfo::from_sec1(&self.to_sec1()?)?,
        };
        Ok(key)
    }

    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(self.to_pkcs8()?.to_der()?))
    }
}

impl ToPem for KeyPair {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::PrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_pkcs8_der()?))
    }
}
