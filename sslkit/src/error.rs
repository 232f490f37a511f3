//! Error taxonomy shared by every sslkit crate.
//!
//! Each crate has its own `thiserror` enum with precise variants. Callers
//! that only need to tell "invalid" from "unsupported" from "wrong password"
//! use [`Kind::kind`] instead of matching every crate's variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unrecoverable structural decode failure.
    MalformedEncoding,
    /// PEM markers missing, mismatched or carrying an unknown label, or a
    /// body that is not base64.
    InvalidPemFraming,
    /// Recognized structure with a version this engine does not implement.
    UnsupportedVersion,
    /// Recognized structure with an algorithm OID this engine does not implement.
    UnknownAlgorithm,
    /// A password-protected container was processed without a password.
    PasswordRequired,
    /// The supplied password did not open the container.
    IncorrectPassword,
    /// The random source failed. Fatal: never degraded.
    InsufficientEntropy,
    /// A cooperative abort signal stopped the operation.
    Cancelled,
    /// Caller-supplied parameters are not usable (bad DN text, mismatched key, ...).
    InvalidInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MalformedEncoding => "malformed encoding",
            ErrorKind::InvalidPemFraming => "invalid PEM framing",
            ErrorKind::UnsupportedVersion => "unsupported version",
            ErrorKind::UnknownAlgorithm => "unknown algorithm",
            ErrorKind::PasswordRequired => "password required",
            ErrorKind::IncorrectPassword => "incorrect password",
            ErrorKind::InsufficientEntropy => "insufficient entropy",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InvalidInput => "invalid input",
        };
        write!(f, "{}", s)
    }
}

/// Implemented by every crate error to expose its [`ErrorKind`].
pub trait Kind {
    fn kind(&self) -> ErrorKind;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ErrorKind;

    #[rstest]
    #[case(ErrorKind::MalformedEncoding, "malformed encoding")]
    #[case(ErrorKind::PasswordRequired, "password required")]
    #[case(ErrorKind::InsufficientEntropy, "insufficient entropy")]
    fn test_error_kind_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(expected, kind.to_string());
    }
}
