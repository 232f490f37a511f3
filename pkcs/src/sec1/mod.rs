//! SEC1 - Elliptic Curve Private Key Structure
//!
//! [RFC 5915](https://datatracker.ietf.org/doc/html/rfc5915) ECPrivateKey with
//! optional curve parameters and public key.

pub mod error;
mod types;

pub use error::{Error, Result};
pub use types::ECPrivateKey;
