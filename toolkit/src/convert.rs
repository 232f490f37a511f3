//! Conversions between PEM text and the PKCS#7 / PKCS#12 containers.
//!
//! A [`ConversionJob`] names its source and target [`Format`]; the pair
//! resolves to one [`Conversion`], each with its own function. Certificate
//! and key bytes pass through untouched, so converting there and back
//! reproduces them exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkcs::pkcs1::RSAPrivateKey;
use sslkit_pkcs::pkcs12::{Bundle, Pfx, Pkcs12Options};
use sslkit_pkcs::pkcs7::SignedData;
use sslkit_pkcs::pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo};
use sslkit_pkcs::sec1::ECPrivateKey;
use sslkit_x509::Certificate;
use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

const DER_SEQUENCE: u8 = 0x30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pem,
    Pkcs7,
    Pkcs12,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Pem => "PEM",
            Format::Pkcs7 => "PKCS#7",
            Format::Pkcs12 => "PKCS#12",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pem" => Ok(Format::Pem),
            "pkcs7" | "pkcs#7" | "p7b" | "p7c" => Ok(Format::Pkcs7),
            "pkcs12" | "pkcs#12" | "p12" | "pfx" => Ok(Format::Pkcs12),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

/// A supported (source, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conversion {
    PemToPkcs7,
    Pkcs7ToPem,
    PemToPkcs12,
    Pkcs12ToPem,
}

impl Conversion {
    pub fn between(from: Format, to: Format) -> Result<Self> {
        match (from, to) {
            (Format::Pem, Format::Pkcs7) => Ok(Conversion::PemToPkcs7),
            (Format::Pkcs7, Format::Pem) => Ok(Conversion::Pkcs7ToPem),
            (Format::Pem, Format::Pkcs12) => Ok(Conversion::PemToPkcs12),
            (Format::Pkcs12, Format::Pem) => Ok(Conversion::Pkcs12ToPem),
            (from, to) => Err(Error::UnsupportedConversion { from, to }),
        }
    }

    pub fn needs_password(&self) -> bool {
        matches!(self, Conversion::PemToPkcs12 | Conversion::Pkcs12ToPem)
    }
}

/// One conversion request. The password is wiped when the job is dropped.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub source: Format,
    pub target: Format,
    /// PEM text as UTF-8, or container bytes (DER, base64 text or a PEM
    /// armored PKCS#7 are all accepted)
    pub payload: Vec<u8>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub pkcs12: Pkcs12Options,
}

impl ConversionJob {
    pub fn new(source: Format, target: Format, payload: impl Into<Vec<u8>>) -> Self {
        ConversionJob {
            source,
            target,
            payload: payload.into(),
            password: None,
            pkcs12: Pkcs12Options::default(),
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_options(mut self, options: Pkcs12Options) -> Self {
        self.pkcs12 = options;
        self
    }

    fn password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(Error::PasswordRequired)
    }
}

impl fmt::Debug for ConversionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionJob")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("payload", &self.payload.len())
            .field("password", &self.password.is_some())
            .field("pkcs12", &self.pkcs12)
            .finish()
    }
}

impl Drop for ConversionJob {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Runs `job` and returns the target encoding: PEM text as UTF-8 bytes, or
/// container DER.
pub fn convert(job: ConversionJob) -> Result<Vec<u8>> {
    let conversion = Conversion::between(job.source, job.target)?;
    debug!(?conversion, payload = job.payload.len(), "converting");
    match conversion {
        Conversion::PemToPkcs7 => pem_to_pkcs7(&job),
        Conversion::Pkcs7ToPem => pkcs7_to_pem(&job),
        Conversion::PemToPkcs12 => pem_to_pkcs12(&job),
        Conversion::Pkcs12ToPem => pkcs12_to_pem(&job),
    }
}

fn text(payload: &[u8]) -> Result<&str> {
    std::str::from_utf8(payload).map_err(|_| Error::UnrecognizedInput)
}

/// Container bytes given as DER, bare base64 or, when the container has a
/// PEM label, an armored block.
fn binary_input(payload: &[u8], label: Option<Label>) -> Result<Vec<u8>> {
    let start = payload
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(Error::UnrecognizedInput)?;
    if payload[start] == DER_SEQUENCE {
        return Ok(payload[start..].to_vec());
    }
    let text = text(payload)?;
    if text.contains("-----BEGIN") {
        let label = label.ok_or(Error::UnrecognizedInput)?;
        return sslkit_pem::parse_many(text)?
            .into_iter()
            .find(|pem| pem.label() == label)
            .map(Pem::into_body)
            .ok_or(Error::MissingBlock(label));
    }
    Ok(sslkit_pem::base64::decode(text)?)
}

fn certificate_der(pem: &Pem) -> Result<Vec<u8>> {
    // Parsed only to reject garbage; the original bytes are what gets stored
    Certificate::from_pem(pem)?;
    Ok(pem.body().to_vec())
}

fn certificates_to_pem(certificates: &[Vec<u8>], out: &mut String) {
    for der in certificates {
        out.push_str(&Pem::from_bytes(Label::Certificate, der).to_string());
    }
}

fn pem_to_pkcs7(job: &ConversionJob) -> Result<Vec<u8>> {
    let mut certificates = Vec::new();
    for pem in sslkit_pem::parse_many(text(&job.payload)?)? {
        match pem.label() {
            Label::Certificate => certificates.push(certificate_der(&pem)?),
            label => trace!(%label, "skipping block"),
        }
    }
    if certificates.is_empty() {
        return Err(Error::MissingBlock(Label::Certificate));
    }
    debug!(certificates = certificates.len(), "building PKCS#7");
    Ok(SignedData::degenerate(certificates)?.to_der()?)
}

fn pkcs7_to_pem(job: &ConversionJob) -> Result<Vec<u8>> {
    let der = binary_input(&job.payload, Some(Label::Pkcs7))?;
    let signed_data = SignedData::from_der(&der)?;
    debug!(
        certificates = signed_data.certificates().len(),
        signers = signed_data.signer_count(),
        "unpacking PKCS#7"
    );
    let mut out = String::new();
    certificates_to_pem(signed_data.certificates(), &mut out);
    Ok(out.into_bytes())
}

/// PrivateKeyInfo DER for any private key block. Encrypted PKCS#8 is opened
/// with the job password.
fn private_key_der(pem: &Pem, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    if pem.is_legacy_encrypted() {
        return Err(Error::UnexpectedBlock(pem.label()));
    }
    let der = match pem.label() {
        Label::PrivateKey => {
            PrivateKeyInfo::from_pem(pem)?;
            pem.body().to_vec()
        }
        Label::RSAPrivateKey => PrivateKeyInfo::from_pkcs1(&RSAPrivateKey::from_pem(pem)?)?.to_der()?,
        Label::ECPrivateKey => PrivateKeyInfo::from_sec1(&ECPrivateKey::from_pem(pem)?)?.to_der()?,
        Label::EncryptedPrivateKey => {
            return Ok(EncryptedPrivateKeyInfo::from_pem(pem)?.decrypt(password.as_bytes())?);
        }
        label => return Err(Error::UnexpectedBlock(label)),
    };
    Ok(Zeroizing::new(der))
}

fn pem_to_pkcs12(job: &ConversionJob) -> Result<Vec<u8>> {
    let password = job.password()?;
    let mut certificates = Vec::new();
    let mut private_key: Option<Zeroizing<Vec<u8>>> = None;
    for pem in sslkit_pem::parse_many(text(&job.payload)?)? {
        match pem.label() {
            Label::Certificate => certificates.push(certificate_der(&pem)?),
            Label::PrivateKey
            | Label::RSAPrivateKey
            | Label::ECPrivateKey
            | Label::EncryptedPrivateKey => {
                if private_key.is_some() {
                    return Err(Error::MultiplePrivateKeys);
                }
                private_key = Some(private_key_der(&pem, password)?);
            }
            label => trace!(%label, "skipping block"),
        }
    }
    if certificates.is_empty() {
        return Err(Error::MissingBlock(Label::Certificate));
    }

    let pfx = Pfx::seal(
        &certificates,
        private_key.as_deref().map(Vec::as_slice),
        password,
        &job.pkcs12,
    )?;
    Ok(pfx.to_der()?)
}

fn pkcs12_to_pem(job: &ConversionJob) -> Result<Vec<u8>> {
    let password = job.password()?;
    let der = binary_input(&job.payload, None)?;
    let bundle = Pfx::from_der(&der)?.open(password)?;
    debug!(
        certificates = bundle.certificates.len(),
        key = bundle.private_key.is_some(),
        "unpacking PKCS#12"
    );

    let attributes = bag_attributes(&bundle);
    let mut out = String::new();
    for (i, der) in bundle.certificates.iter().enumerate() {
        // The first certificate is the one paired with the key
        if i == 0 {
            out.push_str(&attributes);
        }
        out.push_str(&Pem::from_bytes(Label::Certificate, der).to_string());
    }
    if let Some(key) = &bundle.private_key {
        let pem = PrivateKeyInfo::from_der(key)?.to_pem()?;
        out.push_str(&attributes);
        out.push_str(&pem.to_string());
    }
    Ok(out.into_bytes())
}

/// OpenSSL style `Bag Attributes` preamble. PEM parsers skip it as text
/// outside the blocks.
fn bag_attributes(bundle: &Bundle) -> String {
    if bundle.friendly_name.is_none() && bundle.local_key_id.is_none() {
        return String::new();
    }
    let mut out = String::from("Bag Attributes\n");
    if let Some(name) = &bundle.friendly_name {
        out.push_str(&format!("    friendlyName: {}\n", name));
    }
    if let Some(id) = &bundle.local_key_id {
        let hex = id
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("    localKeyID: {}\n", hex));
    }
    out
}
