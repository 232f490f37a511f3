//! PKCS structures for keys and certificate containers.
//!
//! - [`pkcs1`]: RSA private and public keys (RFC 8017)
//! - [`sec1`]: EC private keys (RFC 5915)
//! - [`pkcs7`]: certificate-only SignedData (RFC 2315)
//! - [`pkcs8`]: PrivateKeyInfo and PBES2-encrypted keys (RFC 5958, RFC 8018)
//! - [`pkcs9`]: attributes shared by the above (RFC 2985)
//! - [`pkcs12`]: password-protected PFX bundles (RFC 7292)

pub mod error;
pub mod pkcs1;
pub mod pkcs12;
pub mod pkcs7;
pub mod pkcs8;
pub mod pkcs9;
pub mod sec1;

pub use error::{Error, Result};
