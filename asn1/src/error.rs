//! Error types for ASN.1 parsing and encoding.

use std::num::ParseIntError;

use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

/// Errors that can occur during ASN.1 parsing and encoding operations.
#[derive(Debug, Error)]
pub enum Error {
    // Boolean errors
    #[error("invalid boolean")]
    InvalidBoolean,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("parse int error: {0}")]
    ParseInt(ParseIntError),

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: component overflows")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    #[error("NULL: unexpected content")]
    InvalidNull,

    // String type errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("PrintableString: invalid character")]
    PrintableStringInvalidCharacter,
    #[error("IA5String: invalid character")]
    Ia5StringInvalidCharacter,
    #[error("T61String: character outside Latin-1")]
    T61StringInvalidCharacter,
    #[error("BMPString: odd byte length {0}")]
    BmpStringOddLength(usize),
    #[error("BMPString: invalid UTF-16")]
    BmpStringInvalidUtf16,

    // Time errors
    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,

    // Structural errors
    #[error("expected {0}")]
    Expected(&'static str),
    #[error("invalid context-specific value: [{slot}] {msg}")]
    InvalidContextSpecific { slot: u8, msg: String },

    // DER errors
    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] sslkit_der::Error),
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedEncoding
    }
}
