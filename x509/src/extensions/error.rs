//! Extension-specific error types

use sslkit::error::{ErrorKind, Kind as _};
use thiserror::Error;

/// Context for where an extension error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Extensions,
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAltName,
    GeneralName,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extensions => write!(f, "Extensions"),
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::AuthorityKeyIdentifier => write!(f, "AuthorityKeyIdentifier"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::GeneralName => write!(f, "GeneralName"),
        }
    }
}

/// Extension parsing errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: empty sequence")]
    EmptySequence(Kind),

    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: expected BIT STRING")]
    ExpectedBitString(Kind),

    #[error("{0}: expected OCTET STRING")]
    ExpectedOctetString(Kind),

    #[error("{0}: unexpected element type")]
    UnexpectedElementType(Kind),

    #[error("OID mismatch: expected {expected}, got {actual}")]
    OidMismatch { expected: String, actual: String },

    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    #[error("GeneralName: IA5String must be valid ASCII")]
    GeneralNameInvalidAscii,

    #[error("GeneralName: iPAddress must be 4 or 16 bytes, got {0}")]
    InvalidIpAddressLength(usize),

    #[error("GeneralName: otherName must hold a type-id and a [0] EXPLICIT value")]
    InvalidOtherName,

    #[error("{0}: at least one GeneralName required")]
    AtLeastOneGeneralNameRequired(Kind),

    #[error("ExtendedKeyUsage: at least one KeyPurposeId required")]
    ExtendedKeyUsageEmpty,

    #[error("ExtendedKeyUsage: all elements must be OBJECT IDENTIFIER")]
    ExtendedKeyUsageExpectedOid,

    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[from] sslkit_asn1::error::Error),

    #[error("PKIX types error: {0}")]
    PkixTypes(#[from] sslkit_pkix_types::Error),
}

impl sslkit::error::Kind for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::PkixTypes(e) => e.kind(),
            _ => ErrorKind::MalformedEncoding,
        }
    }
}

/// Result type for extension operations
pub type Result<T> = std::result::Result<T, Error>;
