//! X.509 certificates (RFC 5280) and PKCS#10 requests (RFC 2986).
//!
//! Parsed certificates and requests keep the exact DER they were read from,
//! so signatures are always checked against the original TBS bytes.
//! [`sign`] builds new requests and certificates, [`chain`] validates a
//! leaf against a set of issuers.

pub mod certificate;
pub mod chain;
pub mod error;
pub mod extensions;
mod fingerprint;
pub mod request;
pub mod sign;
mod summary;

#[cfg(test)]
mod test_fixtures;

pub use certificate::{Certificate, TbsCertificate, Validity, Version};
pub use chain::{ValidationResult, ValidationStatus, verify_chain, verify_chain_at};
pub use error::{Error, Result};
pub use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, Extension, Extensions,
    GeneralName, KeyUsage, RawExtension, SubjectAltName, SubjectKeyIdentifier,
};
pub use fingerprint::fingerprint;
pub use request::{CertificateRequest, CertificationRequestInfo};
pub use sign::{issue, issue_with_validity, random_serial_number, self_sign, self_sign_with_validity, sign_csr};
pub use summary::{CertificateSummary, RequestSummary};
