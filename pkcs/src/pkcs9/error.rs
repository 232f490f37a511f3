//! Error types for PKCS#9

use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid PKCS#9 attribute: {0}")]
    InvalidAttribute(String),

    #[error("{name}: expected {expected}")]
    UnexpectedValue {
        name: &'static str,
        expected: &'static str,
    },

    /// Attributes declared SINGLE VALUE carry exactly one value
    #[error("{name}: expected a single value, got {actual}")]
    InvalidValueCount { name: &'static str, actual: usize },

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("value too long: {actual} characters (max: {max})")]
    ValueTooLong { max: usize, actual: usize },

    #[error("OID mismatch: expected {expected}, got {actual}")]
    OidMismatch { expected: String, actual: String },

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::PkixTypes(e) => e.kind(),
            Error::EmptyValue(_) | Error::ValueTooLong { .. } => ErrorKind::InvalidInput,
            _ => ErrorKind::MalformedEncoding,
        }
    }
}
