use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: expected {expected}")]
    Expected {
        context: &'static str,
        expected: &'static str,
    },
    #[error("invalid attribute type and value: {0}")]
    InvalidAttributeTypeAndValue(String),
    #[error("invalid distinguished name text: {0}")]
    InvalidDistinguishedName(String),
    #[error("unknown attribute name: {0}")]
    UnknownAttributeName(String),
    #[error("invalid algorithm identifier: {0}")]
    InvalidAlgorithmIdentifier(String),
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("unknown named curve: {0}")]
    UnknownCurve(String),
    #[error("invalid extension: {0}")]
    InvalidExtension(String),
    #[error("invalid certificate serial number: {0}")]
    InvalidCertificateSerialNumber(String),
    #[error("invalid ASN.1: {0}")]
    InvalidASN1(#[from] sslkit_asn1::error::Error),
}

impl Error {
    pub(crate) fn expected(context: &'static str, expected: &'static str) -> Self {
        Error::Expected { context, expected }
    }
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownAlgorithm(_) | Error::UnknownCurve(_) => ErrorKind::UnknownAlgorithm,
            Error::InvalidDistinguishedName(_) | Error::UnknownAttributeName(_) => {
                ErrorKind::InvalidInput
            }
            _ => ErrorKind::MalformedEncoding,
        }
    }
}
