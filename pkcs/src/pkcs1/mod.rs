//! PKCS#1: RSA key syntax
//!
//! [RFC 8017](https://datatracker.ietf.org/doc/html/rfc8017) Appendix A.1.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::{RSAPrivateKey, RSAPublicKey};
