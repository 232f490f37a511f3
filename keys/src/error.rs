use sslkit::error::{ErrorKind, Kind};
use sslkit_pem::Label;
use sslkit_pkix_types::{PublicKeyAlgorithm, SignatureAlgorithm};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("random source failed: {0}")]
    Entropy(rand_core::Error),

    #[error("key generation cancelled")]
    Cancelled,

    #[error("unsupported RSA modulus size: {0} bits")]
    UnsupportedKeySize(usize),

    #[error("invalid key spec: {0}")]
    InvalidKeySpec(String),

    #[error("{algorithm} cannot be used with an {key} key")]
    AlgorithmMismatch {
        algorithm: SignatureAlgorithm,
        key: PublicKeyAlgorithm,
    },

    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("EC private key does not name its curve")]
    MissingCurve,

    #[error("EC private key does not match its embedded public key")]
    InconsistentKey,

    #[error("a password is required to decrypt the key")]
    PasswordRequired,

    #[error("legacy PEM encryption is not supported")]
    LegacyEncryption,

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(Label),

    #[error("not a PKCS#8, PKCS#1 or SEC1 private key")]
    UnrecognizedKey,

    #[error("key generation worker panicked")]
    WorkerPanicked,

    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("ECDSA error: {0}")]
    Ecdsa(#[from] ecdsa::Error),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] sslkit_pkcs::pkcs1::Error),

    #[error("SEC1 error: {0}")]
    Sec1(#[from] sslkit_pkcs::sec1::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] sslkit_pkcs::pkcs8::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PEM error: {0}")]
    Pem(#[from] sslkit_pem::error::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Entropy(_) => ErrorKind::InsufficientEntropy,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::PasswordRequired => ErrorKind::PasswordRequired,
            Error::LegacyEncryption => ErrorKind::UnknownAlgorithm,
            Error::UnsupportedKeySize(_)
            | Error::InvalidKeySpec(_)
            | Error::AlgorithmMismatch { .. }
            | Error::InconsistentKey
            | Error::UnexpectedLabel(_)
            | Error::WorkerPanicked
            | Error::Rsa(_) => ErrorKind::InvalidInput,
            Error::InvalidKey(_) | Error::MissingCurve | Error::UnrecognizedKey | Error::Ecdsa(_) => {
                ErrorKind::MalformedEncoding
            }
            Error::Pkcs1(e) => e.kind(),
            Error::Sec1(e) => e.kind(),
            Error::Pkcs8(e) => e.kind(),
            Error::PkixTypes(e) => e.kind(),
            Error::Asn1(e) => e.kind(),
            Error::Pem(e) => e.kind(),
        }
    }
}
