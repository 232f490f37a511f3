use sslkit::error::{ErrorKind, Kind};
use sslkit_pem::Label;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported certificate version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("invalid certificate request: {0}")]
    InvalidRequest(String),
    #[error("invalid validity: {0}")]
    InvalidValidity(String),
    #[error("validity days must be positive and representable, got {0}")]
    InvalidValidityDays(i64),
    #[error("subject public key does not belong to the signing key pair")]
    KeyMismatch,
    #[error("certificate request signature does not verify")]
    InvalidRequestSignature,
    #[error("random source failed: {0}")]
    Entropy(rand_core::Error),
    #[error("unexpected PEM label: expected {expected}, got {actual}")]
    UnexpectedLabel { expected: Label, actual: Label },
    #[error("extension: {0}")]
    Extension(#[from] crate::extensions::Error),
    #[error("key: {0}")]
    Keys(#[from] sslkit_keys::Error),
    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),
    #[error("PKCS#9: {0}")]
    Pkcs9(#[from] sslkit_pkcs::pkcs9::Error),
    #[error("invalid ASN.1: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),
    #[error("invalid DER: {0}")]
    Der(#[from] sslkit_der::Error),
    #[error("PEM: {0}")]
    Pem(#[from] sslkit_pem::error::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::InvalidCertificate(_)
            | Error::InvalidRequest(_)
            | Error::InvalidValidity(_)
            | Error::Asn1(_)
            | Error::Der(_) => ErrorKind::MalformedEncoding,
            Error::InvalidValidityDays(_)
            | Error::KeyMismatch
            | Error::InvalidRequestSignature => ErrorKind::InvalidInput,
            Error::UnexpectedLabel { .. } => ErrorKind::InvalidPemFraming,
            Error::Entropy(_) => ErrorKind::InsufficientEntropy,
            Error::Extension(e) => e.kind(),
            Error::Keys(e) => e.kind(),
            Error::PkixTypes(e) => e.kind(),
            Error::Pkcs9(e) => e.kind(),
            Error::Pem(e) => e.kind(),
        }
    }
}
