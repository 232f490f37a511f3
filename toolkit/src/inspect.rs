//! Summaries of every block in a PEM bundle, chosen by block label.

use std::str::FromStr;

use serde::Serialize;
use sslkit_keys::{KeyPair, PublicKey};
use sslkit_pem::{FromPem, Label, Pem};
use sslkit_pkcs::pkcs1::RSAPublicKey;
use sslkit_pkcs::pkcs7::SignedData;
use sslkit_pkcs::pkcs8::EncryptedPrivateKeyInfo;
use sslkit_pkix_types::SubjectPublicKeyInfo;
use sslkit_x509::{Certificate, CertificateRequest, CertificateSummary, RequestSummary};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyFormat {
    #[serde(rename = "PKCS#1")]
    Pkcs1,
    #[serde(rename = "SEC1")]
    Sec1,
    #[serde(rename = "PKCS#8")]
    Pkcs8,
    #[serde(rename = "PKCS#8 encrypted")]
    EncryptedPkcs8,
    #[serde(rename = "SPKI")]
    Spki,
}

/// Algorithm and size are unknown for encrypted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    pub format: KeyFormat,
    pub algorithm: Option<String>,
    pub bits: Option<usize>,
}

impl KeySummary {
    fn new(format: KeyFormat, algorithm: impl ToString, bits: usize) -> Self {
        KeySummary {
            format,
            algorithm: Some(algorithm.to_string()),
            bits: Some(bits),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pkcs7Summary {
    pub certificates: usize,
    pub subjects: Vec<String>,
    pub signers: usize,
    pub crls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockSummary {
    Certificate(Box<CertificateSummary>),
    CertificateRequest(RequestSummary),
    PrivateKey(KeySummary),
    PublicKey(KeySummary),
    Pkcs7(Pkcs7Summary),
    /// Recognized framing without a detailed view (CRLs)
    Other { label: String, length: usize },
}

impl BlockSummary {
    pub fn of(pem: &Pem) -> Result<Self> {
        let summary = match pem.label() {
            Label::Certificate => {
                let cert = Certificate::from_pem(pem)?;
                BlockSummary::Certificate(Box::new(CertificateSummary::new(&cert)?))
            }
            Label::CertificateRequest => {
                let csr = CertificateRequest::from_pem(pem)?;
                BlockSummary::CertificateRequest(RequestSummary::new(&csr)?)
            }
            Label::PrivateKey | Label::RSAPrivateKey | Label::ECPrivateKey => {
                let format = match pem.label() {
                    Label::RSAPrivateKey => KeyFormat::Pkcs1,
                    Label::ECPrivateKey => KeyFormat::Sec1,
                    _ => KeyFormat::Pkcs8,
                };
                let key = KeyPair::from_pem(pem, None)?;
                BlockSummary::PrivateKey(KeySummary::new(format, key.algorithm(), key.bits()))
            }
            Label::EncryptedPrivateKey => {
                EncryptedPrivateKeyInfo::from_pem(pem)?;
                BlockSummary::PrivateKey(KeySummary {
                    format: KeyFormat::EncryptedPkcs8,
                    algorithm: None,
                    bits: None,
                })
            }
            Label::PublicKey => {
                let spki = SubjectPublicKeyInfo::from_der(pem.body())?;
                let key = PublicKey::from_spki(&spki)?;
                BlockSummary::PublicKey(KeySummary::new(KeyFormat::Spki, key.algorithm(), key.bits()))
            }
            Label::RSAPublicKey => {
                let key = PublicKey::from_pkcs1(&RSAPublicKey::from_der(pem.body())?)?;
                BlockSummary::PublicKey(KeySummary::new(KeyFormat::Pkcs1, key.algorithm(), key.bits()))
            }
            Label::Pkcs7 => {
                let signed_data = SignedData::from_pem(pem)?;
                let subjects = signed_data
                    .certificates()
                    .iter()
                    .map(|der| Certificate::from_der(der).map(|c| c.subject().to_string()))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                BlockSummary::Pkcs7(Pkcs7Summary {
                    certificates: subjects.len(),
                    subjects,
                    signers: signed_data.signer_count(),
                    crls: signed_data.crl_count(),
                })
            }
            label @ Label::X509Crl => BlockSummary::Other {
                label: label.to_string(),
                length: pem.body().len(),
            },
        };
        Ok(summary)
    }
}

/// Summarizes every PEM block in `text`, in order.
pub fn inspect(text: &str) -> Result<Vec<BlockSummary>> {
    let blocks = sslkit_pem::parse_many(text)?;
    debug!(blocks = blocks.len(), "inspecting PEM input");
    blocks.iter().map(BlockSummary::of).collect()
}

/// Summary of a single block.
pub fn inspect_one(text: &str) -> Result<BlockSummary> {
    BlockSummary::of(&Pem::from_str(text)?)
}
