//! RFC 5958 EncryptedPrivateKeyInfo
//!
//! ```asn1
//! EncryptedPrivateKeyInfo ::= SEQUENCE {
//!     encryptionAlgorithm  EncryptionAlgorithmIdentifier,
//!     encryptedData        EncryptedData
//! }
//!
//! EncryptedData ::= OCTET STRING
//! ```
//!
//! Also the body of a PKCS#12 PKCS8ShroudedKeyBag.

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, OctetString};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkix_types::AlgorithmIdentifier;
use tracing::debug;
use zeroize::Zeroizing;

use super::error::{Error, Result};
use super::pbes2::Pbes2Params;
use super::types::PrivateKeyInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPrivateKeyInfo {
    pub encryption_algorithm: AlgorithmIdentifier,
    pub encrypted_data: Vec<u8>,
}

impl EncryptedPrivateKeyInfo {
    /// Encrypts the DER of a PrivateKeyInfo with PBES2.
    pub fn encrypt(key_der: &[u8], password: &[u8], params: &Pbes2Params) -> Result<Self> {
        debug!(iterations = params.iterations(), "encrypting private key");
        Ok(EncryptedPrivateKeyInfo {
            encryption_algorithm: params.to_identifier()?,
            encrypted_data: params.encrypt(password, key_der)?,
        })
    }

    /// Decrypts to the exact PrivateKeyInfo DER that was encrypted.
    ///
    /// Plaintext that does not parse as a PrivateKeyInfo is reported as an
    /// incorrect password: a wrong key occasionally produces valid padding.
    pub fn decrypt(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let params = Pbes2Params::from_identifier(&self.encryption_algorithm)?;
        let plaintext = params.decrypt(password, &self.encrypted_data)?;
        if PrivateKeyInfo::from_der(&plaintext).is_err() {
            return Err(Error::IncorrectPassword);
        }
        Ok(plaintext)
    }

    pub fn decrypt_key(&self, password: &[u8]) -> Result<PrivateKeyInfo> {
        PrivateKeyInfo::from_der(&self.decrypt(password)?)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element = self.encode()?;
        Ok(element.to_der()?)
    }
}

impl DecodableFrom<Element> for EncryptedPrivateKeyInfo {}

impl Decoder<Element, EncryptedPrivateKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<EncryptedPrivateKeyInfo> {
        match self.as_sequence() {
            Some([algorithm, Element::OctetString(data)]) => Ok(EncryptedPrivateKeyInfo {
                encryption_algorithm: algorithm.decode()?,
                encrypted_data: data.as_bytes().to_vec(),
            }),
            _ => Err(Error::InvalidStructure(
                "EncryptedPrivateKeyInfo must be SEQUENCE { AlgorithmIdentifier, OCTET STRING }",
            )),
        }
    }
}

impl EncodableTo<EncryptedPrivateKeyInfo> for Element {}

impl Encoder<EncryptedPrivateKeyInfo, Element> for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            self.encryption_algorithm.encode()?,
            Element::OctetString(OctetString::from(self.encrypted_data.as_slice())),
        ]))
    }
}

impl ToPem for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::EncryptedPrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

impl FromPem for EncryptedPrivateKeyInfo {
    type Error = Error;

    fn expected_label() -> Label {
        Label::EncryptedPrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        Self::from_der(pem.body())
    }
}
