//! PKCS#7: Cryptographic Message Syntax
//!
//! [RFC 2315](https://datatracker.ietf.org/doc/html/rfc2315) ContentInfo and
//! the SignedData content type, used here as a certificate bag (the
//! "degenerate" certs-only form `.p7b` files carry).

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ContentInfo, OID_DATA, OID_ENCRYPTED_DATA, OID_SIGNED_DATA, SignedData};
