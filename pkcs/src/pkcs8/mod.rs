//! PKCS#8: Private-Key Information Syntax Specification
//!
//! [RFC 5958](https://datatracker.ietf.org/doc/html/rfc5958) (Asymmetric Key
//! Packages), which obsoletes RFC 5208, plus the
//! [RFC 8018](https://datatracker.ietf.org/doc/html/rfc8018) PBES2 scheme used by
//! EncryptedPrivateKeyInfo and PKCS#12 shrouded key bags.

mod encrypted;
pub mod error;
pub mod pbes2;
mod types;

pub use encrypted::EncryptedPrivateKeyInfo;
pub use error::{Error, Result};
pub use pbes2::{Pbes2Cipher, Pbes2Params, Prf};
pub use types::{PrivateKeyInfo, Version};
