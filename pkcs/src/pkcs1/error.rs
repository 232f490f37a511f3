use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("expected SEQUENCE")]
    ExpectedSequence,

    #[error("expected {expected} elements, got {actual}")]
    InvalidElementCount {
        expected: &'static str,
        actual: usize,
    },

    #[error("expected INTEGER for {field}")]
    ExpectedInteger { field: &'static str },

    #[error("invalid version: {0} (must be 0 for two-prime)")]
    InvalidVersion(i64),

    #[error("multi-prime keys are not supported")]
    MultiPrime,

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(sslkit_pem::Label),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidVersion(_) | Error::MultiPrime => ErrorKind::UnsupportedVersion,
            Error::UnexpectedLabel(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::MalformedEncoding,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
