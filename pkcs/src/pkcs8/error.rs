use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid version: {0}")]
    InvalidVersion(i64),

    #[error("invalid structure: {0}")]
    InvalidStructure(&'static str),

    #[error("unsupported encryption algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid PBES2 parameters: {0}")]
    InvalidParameters(String),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("random source failed: {0}")]
    Entropy(rand_core::Error),

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(sslkit_pem::Label),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),

    #[error("PKCS#9 attribute error: {0}")]
    Pkcs9(#[from] crate::pkcs9::Error),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("SEC1 error: {0}")]
    Sec1(#[from] crate::sec1::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidVersion(_) => ErrorKind::UnsupportedVersion,
            Error::UnsupportedAlgorithm(_) => ErrorKind::UnknownAlgorithm,
            Error::IncorrectPassword => ErrorKind::IncorrectPassword,
            Error::Entropy(_) => ErrorKind::InsufficientEntropy,
            Error::UnexpectedLabel(_) => ErrorKind::InvalidInput,
            Error::PkixTypes(e) => e.kind(),
            Error::Pkcs9(e) => e.kind(),
            Error::Pkcs1(e) => e.kind(),
            Error::Sec1(e) => e.kind(),
            _ => ErrorKind::MalformedEncoding,
        }
    }
}
