//! SEC1 (RFC 5915) error types

use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

/// Errors that can occur when parsing or encoding SEC1 structures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected OCTET STRING for privateKey")]
    ExpectedOctetString,

    /// The sequence has fewer elements than required
    #[error("insufficient elements: {0}")]
    InsufficientElements(&'static str),

    /// Must be 1 (ecPrivkeyVer1)
    #[error("invalid version: expected 1 (ecPrivkeyVer1), got {0}")]
    InvalidVersion(i64),

    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(sslkit_pem::Label),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::PkixTypes(e) => e.kind(),
            Error::InvalidVersion(_) => ErrorKind::UnsupportedVersion,
            Error::UnexpectedLabel(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::MalformedEncoding,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
