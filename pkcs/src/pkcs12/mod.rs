//! PKCS#12: Personal Information Exchange Syntax
//!
//! [RFC 7292](https://datatracker.ietf.org/doc/html/rfc7292) PFX files holding
//! certificates and one private key under a password. New files use PBES2
//! (PBKDF2-HMAC-SHA256, AES-256-CBC) for bags and an HMAC-SHA256 MAC; legacy
//! PKCS#12 PBE schemes are rejected as unknown algorithms.

mod bags;
pub mod error;
mod kdf;
mod mac;
mod pfx;

pub use bags::{BagValue, OID_CERT_BAG, OID_KEY_BAG, OID_PKCS8_SHROUDED_KEY_BAG, SafeBag};
pub use error::{Error, Result};
pub use mac::MacData;
pub use pfx::{Bundle, Pfx, Pkcs12Options};
