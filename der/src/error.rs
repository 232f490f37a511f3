use sslkit::error::{ErrorKind, Kind};
use thiserror::Error;

/// Errors raised while decoding DER.
///
/// Every variant is a structural failure; DER has no "unsupported" cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("empty input")]
    Empty,
    #[error("truncated input")]
    Truncated,
    #[error("indefinite length is not allowed in DER")]
    IndefiniteLength,
    #[error("length field of {0} bytes overflows")]
    LengthOverflow(usize),
    #[error("length is not minimally encoded")]
    NonMinimalLength,
    #[error("tag number is not minimally encoded")]
    NonMinimalTag,
    #[error("tag number overflows")]
    TagOverflow,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("{0} bytes of trailing data")]
    TrailingData(usize),
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
}

impl<'a> nom::error::ParseError<&'a [u8]> for Error {
    fn from_error_kind(_input: &'a [u8], kind: nom::error::ErrorKind) -> Self {
        match kind {
            nom::error::ErrorKind::Eof => Error::Truncated,
            kind => Error::Parser(kind),
        }
    }

    fn append(_input: &'a [u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<Error>> for Error {
    fn from(e: nom::Err<Error>) -> Self {
        match e {
            nom::Err::Incomplete(_) => Error::Truncated,
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

impl Kind for Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedEncoding
    }
}
