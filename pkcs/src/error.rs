use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] crate::pkcs1::Error),

    #[error("SEC1 error: {0}")]
    Sec1(#[from] crate::sec1::Error),

    #[error("PKCS#7 error: {0}")]
    Pkcs7(#[from] crate::pkcs7::Error),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] crate::pkcs8::Error),

    #[error("PKCS#9 error: {0}")]
    Pkcs9(#[from] crate::pkcs9::Error),

    #[error("PKCS#12 error: {0}")]
    Pkcs12(#[from] crate::pkcs12::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Pkcs1(e) => e.kind(),
            Error::Sec1(e) => e.kind(),
            Error::Pkcs7(e) => e.kind(),
            Error::Pkcs8(e) => e.kind(),
            Error::Pkcs9(e) => e.kind(),
            Error::Pkcs12(e) => e.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
