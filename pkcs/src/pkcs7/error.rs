use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid structure: {0}")]
    InvalidStructure(&'static str),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("unsupported SignedData version: {0}")]
    UnsupportedVersion(i64),

    /// Only certificate-only SignedData is re-encoded
    #[error("SignedData carries signers or CRLs and cannot be re-encoded")]
    NotDegenerate,

    #[error("unexpected PEM label: {0}")]
    UnexpectedLabel(sslkit_pem::Label),

    #[error("DER error: {0}")]
    Der(#[from] sslkit_der::Error),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::UnsupportedContentType(_) => ErrorKind::UnknownAlgorithm,
            Error::NotDegenerate | Error::UnexpectedLabel(_) => ErrorKind::InvalidInput,
            Error::PkixTypes(e) => e.kind(),
            _ => ErrorKind::MalformedEncoding,
        }
    }
}
