//! PEM framing (RFC 7468) over DER payloads.
//!
//! A [`Pem`] block holds the decoded body; [`Display`] produces the textual
//! form with 64 character lines.

pub mod base64;
pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use ::base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const CERTIFICATE_REQUEST_LABEL: &str = "CERTIFICATE REQUEST";
const NEW_CERTIFICATE_REQUEST_LABEL: &str = "NEW CERTIFICATE REQUEST";
const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";
const PKCS7_LABEL: &str = "PKCS7";
const CMS_LABEL: &str = "CMS";
const X509_CRL_LABEL: &str = "X509 CRL";

const LINE_WIDTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// X.509 Certificate
    Certificate,
    /// PKCS#10 certification request (also accepts the legacy `NEW` prefix)
    CertificateRequest,
    /// PKCS#8 private key (non-encrypted)
    PrivateKey,
    /// PKCS#8 encrypted private key
    EncryptedPrivateKey,
    /// PKCS#1 RSA private key
    RSAPrivateKey,
    /// SEC1 EC private key
    ECPrivateKey,
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSA public key
    RSAPublicKey,
    /// PKCS#7 / CMS ContentInfo
    Pkcs7,
    /// Certificate revocation list
    X509Crl,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Certificate => CERTIFICATE_LABEL,
            Label::CertificateRequest => CERTIFICATE_REQUEST_LABEL,
            Label::PrivateKey => PRIVATE_KEY_LABEL,
            Label::EncryptedPrivateKey => ENCRYPTED_PRIVATE_KEY_LABEL,
            Label::RSAPrivateKey => RSA_PRIVATE_KEY_LABEL,
            Label::ECPrivateKey => EC_PRIVATE_KEY_LABEL,
            Label::PublicKey => PUBLIC_KEY_LABEL,
            Label::RSAPublicKey => RSA_PUBLIC_KEY_LABEL,
            Label::Pkcs7 => PKCS7_LABEL,
            Label::X509Crl => X509_CRL_LABEL,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CERTIFICATE_LABEL => Ok(Label::Certificate),
            CERTIFICATE_REQUEST_LABEL | NEW_CERTIFICATE_REQUEST_LABEL => {
                Ok(Label::CertificateRequest)
            }
            PRIVATE_KEY_LABEL => Ok(Label::PrivateKey),
            ENCRYPTED_PRIVATE_KEY_LABEL => Ok(Label::EncryptedPrivateKey),
            RSA_PRIVATE_KEY_LABEL => Ok(Label::RSAPrivateKey),
            EC_PRIVATE_KEY_LABEL => Ok(Label::ECPrivateKey),
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            PKCS7_LABEL | CMS_LABEL => Ok(Label::Pkcs7),
            X509_CRL_LABEL => Ok(Label::X509Crl),
            _ => Err(Error::InvalidLabel(s.to_string())),
        }
    }
}

static BOUNDARY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin(Label),
    End(Label),
}

impl Boundary {
    /// `Ok(None)` for lines that are not encapsulation boundaries.
    fn parse(line: &str) -> Result<Option<Boundary>, Error> {
        let line = line.trim();
        if !line.starts_with("-----") {
            return Ok(None);
        }
        let re = BOUNDARY
            .as_ref()
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        let captured = re
            .captures(line)
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        let label = captured
            .get(2)
            .ok_or(Error::InvalidEncapsulationBoundary)?
            .as_str()
            .parse::<Label>()?;
        match captured.get(1).map(|m| m.as_str()) {
            Some("BEGIN") => Ok(Some(Boundary::Begin(label))),
            Some("END") => Ok(Some(Boundary::End(label))),
            _ => Err(Error::InvalidEncapsulationBoundary),
        }
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pem {
    label: Label,
    /// RFC 1421 headers such as `Proc-Type` and `DEK-Info`, in order.
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Pem {
    pub fn new(label: Label, body: Vec<u8>) -> Self {
        Pem {
            label,
            headers: Vec::new(),
            body,
        }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem::new(label, data.to_vec())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// True for PKCS#8 encrypted keys and legacy `Proc-Type: 4,ENCRYPTED` blocks.
    pub fn is_encrypted(&self) -> bool {
        self.label == Label::EncryptedPrivateKey
            || self
                .header("Proc-Type")
                .is_some_and(|v| v.contains("ENCRYPTED"))
    }

    /// True only for RFC 1421 `Proc-Type: 4,ENCRYPTED` blocks.
    pub fn is_legacy_encrypted(&self) -> bool {
        self.header("Proc-Type")
            .is_some_and(|v| v.contains("ENCRYPTED"))
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        if !self.headers.is_empty() {
            for (name, value) in &self.headers {
                writeln!(f, "{}: {}", name, value)?;
            }
            writeln!(f)?;
        }
        let encoded = STANDARD.encode(&self.body);
        // RFC 7468: base64 text should be wrapped at 64 characters
        for chunk in encoded.as_bytes().chunks(LINE_WIDTH) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "-----END {}-----", self.label)
    }
}

/// Trait for types that can be converted to PEM format
pub trait ToPem {
    /// The error type returned by to_pem
    type Error;

    /// Get the PEM label for this type
    fn pem_label(&self) -> Label;

    /// Convert to PEM format
    fn to_pem(&self) -> Result<Pem, Self::Error>;
}

/// Trait for types that can be constructed from PEM format
pub trait FromPem: Sized {
    /// The error type returned by from_pem
    type Error;

    /// Get the expected PEM label for this type
    fn expected_label() -> Label;

    /// Construct from PEM format
    fn from_pem(pem: &Pem) -> Result<Self, Self::Error>;
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // This discards label information from Pem format.
        Ok(self.body.clone())
    }
}

impl DecodableFrom<String> for Pem {}

impl Decoder<String, Pem> for String {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

/// Parse multiple PEM blocks from a string.
///
/// Text outside the blocks is ignored, so certificate bundles with
/// explanatory text between entries parse as well.
///
/// # Example
/// ```
/// use sslkit_pem::parse_many;
///
/// let pem_data = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n-----BEGIN CERTIFICATE-----\nBBBB\n-----END CERTIFICATE-----";
/// let pems = parse_many(pem_data).unwrap();
/// assert_eq!(pems.len(), 2);
/// ```
pub fn parse_many(s: &str) -> Result<Vec<Pem>, Error> {
    // Normalize input: ensure each boundary marker is on its own line
    let normalized = s.replace("----------", "-----\n-----");

    let mut pems = Vec::new();
    let mut current_block: Option<(Label, Vec<&str>)> = None;

    for line in normalized.lines() {
        match Boundary::parse(line)? {
            Some(Boundary::Begin(label)) => {
                if current_block.is_some() {
                    return Err(Error::MissingPostEncapsulationBoundary);
                }
                current_block = Some((label, vec![line]));
            }
            Some(Boundary::End(label)) => {
                let Some((begin_label, mut lines)) = current_block.take() else {
                    return Err(Error::MissingPreEncapsulationBoundary);
                };
                if begin_label != label {
                    return Err(Error::LabelMissMatch);
                }
                lines.push(line);
                let block = lines.join("\n") + "\n";
                pems.push(Pem::from_str(&block)?);
            }
            None => {
                if let Some((_, ref mut lines)) = current_block {
                    lines.push(line);
                }
                // Ignore lines outside of PEM blocks
            }
        }
    }

    if current_block.is_some() {
        return Err(Error::MissingPostEncapsulationBoundary);
    }

    if pems.is_empty() {
        return Err(Error::MissingPreEncapsulationBoundary);
    }

    Ok(pems)
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut state = PemParsingState::default();
        let mut label = Label::Certificate;
        let mut headers: Vec<(String, String)> = vec![];
        let mut base64_lines = vec![];
        let mut base64_finl_lines = vec![];
        let mut lines = s.lines();
        loop {
            match state {
                PemParsingState::Init => match lines.next() {
                    Some(line) => match Boundary::parse(line)? {
                        Some(Boundary::Begin(l)) => {
                            label = l;
                            state = PemParsingState::PreEncapsulationBoundary;
                        }
                        Some(Boundary::End(_)) => {
                            return Err(Error::MissingPreEncapsulationBoundary);
                        }
                        // explanatory text before the block is ignored
                        // https://www.rfc-editor.org/rfc/rfc7468.html#section-5.2
                        None => {}
                    },
                    None => return Err(Error::MissingPreEncapsulationBoundary),
                },
                PemParsingState::PreEncapsulationBoundary | PemParsingState::HeaderSeparator => {
                    let Some(raw) = lines.next() else {
                        return Err(Error::MissingData);
                    };
                    let line = raw.trim();
                    if line.is_empty() {
                        return Err(Error::MissingData);
                    }
                    match Boundary::parse(line)? {
                        Some(Boundary::End(l)) if l == label => {
                            state = PemParsingState::PostEncapsulationBoundary;
                        }
                        Some(Boundary::End(_)) => return Err(Error::LabelMissMatch),
                        Some(Boundary::Begin(_)) => return Err(Error::MissingData),
                        None => {
                            if state == PemParsingState::PreEncapsulationBoundary
                                && line.contains(':')
                            {
                                headers.push(parse_header(line)?);
                                state = PemParsingState::Headers;
                            } else if is_base64_finl(line) {
                                base64_finl_lines.push(line);
                                state = PemParsingState::Base64Finl;
                            } else {
                                base64_lines.push(line);
                                state = PemParsingState::Base64Lines;
                            }
                        }
                    }
                }
                PemParsingState::Headers => match lines.next() {
                    Some(raw) => {
                        if raw.trim().is_empty() {
                            state = PemParsingState::HeaderSeparator;
                        } else if raw.starts_with([' ', '\t']) {
                            // continuation of the previous header value
                            if let Some((_, value)) = headers.last_mut() {
                                value.push_str(raw.trim());
                            }
                        } else if raw.contains(':') {
                            headers.push(parse_header(raw.trim())?);
                        } else {
                            return Err(Error::InvalidHeader(raw.to_string()));
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::Base64Lines => match lines.next() {
                    Some(raw) => {
                        let line = raw.trim();
                        if line.is_empty() {
                            return Err(Error::InvalidBase64Line);
                        }
                        match Boundary::parse(line)? {
                            // reach postdb
                            Some(Boundary::End(l)) if l == label => {
                                state = PemParsingState::PostEncapsulationBoundary;
                            }
                            Some(_) => return Err(Error::LabelMissMatch),
                            None if is_base64_finl(line) => {
                                base64_finl_lines.push(line);
                                state = PemParsingState::Base64Finl;
                            }
                            None => base64_lines.push(line),
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::Base64Finl => match lines.next() {
                    Some(raw) => {
                        let line = raw.trim();
                        if line.is_empty() {
                            return Err(Error::InvalidBase64Finl);
                        }
                        match Boundary::parse(line)? {
                            Some(Boundary::End(l)) if l == label => {
                                state = PemParsingState::PostEncapsulationBoundary;
                            }
                            Some(_) => return Err(Error::LabelMissMatch),
                            None if is_base64_finl(line) => base64_finl_lines.push(line),
                            None => return Err(Error::InvalidBase64Finl),
                        }
                    }
                    None => return Err(Error::MissingPostEncapsulationBoundary),
                },
                PemParsingState::PostEncapsulationBoundary => break,
            }
        }
        let mut encoded = base64_lines.concat();
        encoded.push_str(&base64_finl_lines.concat());
        let body = STANDARD.decode(encoded).map_err(Error::InvalidBody)?;

        Ok(Pem {
            label,
            headers,
            body,
        })
    }
}

/*
* pre-eb -> headers -> separator -> base64lines -> base64finl -> post-eb
*        -------------------------> base64lines ---------------->
*        -------------------------------------------------------->  (empty body)
 */
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum PemParsingState {
    #[default]
    Init,
    PreEncapsulationBoundary,
    Headers,
    HeaderSeparator,
    Base64Lines,
    Base64Finl,
    PostEncapsulationBoundary,
}

fn parse_header(line: &str) -> Result<(String, String), Error> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(Error::InvalidHeader(line.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn is_base64_finl(line: &str) -> bool {
    line.contains('=')
}
