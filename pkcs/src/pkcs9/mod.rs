//! PKCS#9: Selected Object Classes and Attribute Types
//!
//! The [RFC 2985](https://datatracker.ietf.org/doc/html/rfc2985) attributes used
//! by PKCS#8 keys, PKCS#10 requests and PKCS#12 bags:
//!
//! - `challengePassword` - Challenge password for CSRs
//! - `extensionRequest` - X.509 extensions for CSRs
//! - `friendlyName` - Human-readable bag name (PKCS#12)
//! - `localKeyId` - Key/certificate pairing (PKCS#12)
//!
//! # Example
//!
//! ```
//! use sslkit_pkcs::pkcs9::{Attributes, FriendlyName};
//!
//! let mut attributes = Attributes::default();
//! attributes.push(&FriendlyName::new("My Key").unwrap()).unwrap();
//! let name: Option<FriendlyName> = attributes.attribute().unwrap();
//! assert_eq!("My Key", name.unwrap().name());
//! ```

pub mod attribute;
pub mod error;

pub use attribute::{
    Attribute, Attributes, ChallengePassword, ExtensionRequest, FriendlyName, LocalKeyId,
    RawAttribute,
};
pub use error::{Error, Result};
