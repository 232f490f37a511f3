//! PKIX (Public Key Infrastructure using X.509) Common Types
//!
//! Common type definitions used by X.509 certificates (RFC 5280), PKCS#10
//! requests and the PKCS containers.
//!
//! These types are defined in various RFCs including:
//! - RFC 5280: Internet X.509 Public Key Infrastructure Certificate and CRL Profile
//! - RFC 4514: String Representation of Distinguished Names
//! - RFC 5480 / RFC 5758: ECC and ECDSA identifiers

pub mod algorithm;
pub mod directory_string;
pub mod error;
pub mod extension;
pub mod key_identifier;
pub mod name;
mod oid_name;
pub mod serial_number;
pub mod subject_public_key_info;

pub use algorithm::{
    AlgorithmIdentifier, DigestAlgorithm, NamedCurve, PublicKeyAlgorithm, SignatureAlgorithm,
};
pub use directory_string::{DirectoryString, StringKind};
pub use error::{Error, Result};
pub use extension::Extension;
pub use key_identifier::KeyIdentifier;
pub use name::{AttributeTypeAndValue, Name, RelativeDistinguishedName};
pub use oid_name::OidName;
pub use serial_number::CertificateSerialNumber;
pub use subject_public_key_info::SubjectPublicKeyInfo;
