use sslkit::error::{ErrorKind, Kind};
use sslkit_pem::Label;
use thiserror::Error;

use crate::convert::Format;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: Format, to: Format },

    #[error("a password is required")]
    PasswordRequired,

    #[error("input contains no {0} block")]
    MissingBlock(Label),

    #[error("input contains more than one private key")]
    MultiplePrivateKeys,

    #[error("{0} blocks cannot be used here")]
    UnexpectedBlock(Label),

    #[error("input is neither DER nor PEM text")]
    UnrecognizedInput,

    #[error("PEM: {0}")]
    Pem(#[from] sslkit_pem::error::Error),

    #[error("ASN.1: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),

    #[error("PKCS#1: {0}")]
    Pkcs1(#[from] sslkit_pkcs::pkcs1::Error),

    #[error("SEC1: {0}")]
    Sec1(#[from] sslkit_pkcs::sec1::Error),

    #[error("PKCS#7: {0}")]
    Pkcs7(#[from] sslkit_pkcs::pkcs7::Error),

    #[error("PKCS#8: {0}")]
    Pkcs8(#[from] sslkit_pkcs::pkcs8::Error),

    #[error("PKCS#12: {0}")]
    Pkcs12(#[from] sslkit_pkcs::pkcs12::Error),

    #[error("key: {0}")]
    Keys(#[from] sslkit_keys::Error),

    #[error("X.509: {0}")]
    X509(#[from] sslkit_x509::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedConversion { .. }
            | Error::MissingBlock(_)
            | Error::MultiplePrivateKeys
            | Error::UnexpectedBlock(_) => ErrorKind::InvalidInput,
            Error::PasswordRequired => ErrorKind::PasswordRequired,
            Error::UnrecognizedInput => ErrorKind::MalformedEncoding,
            Error::Pem(e) => e.kind(),
            Error::Asn1(_) => ErrorKind::MalformedEncoding,
            Error::PkixTypes(e) => e.kind(),
            Error::Pkcs1(e) => e.kind(),
            Error::Sec1(e) => e.kind(),
            Error::Pkcs7(e) => e.kind(),
            Error::Pkcs8(e) => e.kind(),
            Error::Pkcs12(e) => e.kind(),
            Error::Keys(e) => e.kind(),
            Error::X509(e) => e.kind(),
        }
    }
}
