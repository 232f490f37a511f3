use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("a password is required")]
    PasswordRequired,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("unsupported PFX version: {0}")]
    UnsupportedVersion(i64),

    #[error("unsupported MAC digest: {0}")]
    UnsupportedMac(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("invalid structure: {0}")]
    InvalidStructure(&'static str),

    #[error("more than one private key in the bundle")]
    MultipleKeys,

    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),

    #[error("random source failed: {0}")]
    Entropy(rand_core::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),

    #[error("PKCS#7 error: {0}")]
    Pkcs7(#[from] crate::pkcs7::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error("PKCS#9 attribute error: {0}")]
    Pkcs9(#[from] crate::pkcs9::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::PasswordRequired => ErrorKind::PasswordRequired,
            Error::IncorrectPassword => ErrorKind::IncorrectPassword,
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::UnsupportedMac(_) | Error::UnsupportedContentType(_) => {
                ErrorKind::UnknownAlgorithm
            }
            Error::MultipleKeys | Error::InvalidOptions(_) => ErrorKind::InvalidInput,
            Error::Entropy(_) => ErrorKind::InsufficientEntropy,
            Error::PkixTypes(e) => e.kind(),
            Error::Pkcs7(e) => e.kind(),
            Error::Pkcs8(e) => e.kind(),
            Error::Pkcs9(e) => e.kind(),
            Error::Asn1(_) | Error::InvalidStructure(_) => ErrorKind::MalformedEncoding,
        }
    }
}
