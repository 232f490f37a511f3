//! Flat, serializable views of certificates and requests for display.

use chrono::NaiveDateTime;
use serde::Serialize;
use sslkit_pkcs::pkcs9::ChallengePassword;
use sslkit_pkix_types::DigestAlgorithm;

use crate::certificate::Certificate;
use crate::error::Result;
use crate::extensions::{
    BasicConstraints, ExtendedKeyUsage, Extensions, KeyUsage, SubjectAltName,
};
use crate::fingerprint::fingerprint;
use crate::request::CertificateRequest;
use crate::sign::now;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSummary {
    pub version: String,
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: NaiveDateTime,
    pub not_after: NaiveDateTime,
    /// Within the validity window when the summary was made
    pub valid_now: bool,
    pub signature_algorithm: String,
    pub public_key_algorithm: String,
    pub public_key_bits: usize,
    pub subject_alt_names: Vec<String>,
    pub key_usage: Vec<String>,
    pub extended_key_usage: Vec<String>,
    pub is_ca: bool,
    pub extensions: Vec<String>,
    pub fingerprint_sha1: String,
    pub fingerprint_sha256: String,
    pub self_signed: bool,
    pub has_unknown_critical_extensions: bool,
}

impl CertificateSummary {
    /// Extension contents are summarized best-effort: a typed extension that
    /// fails to parse is left out of its field but still listed by name.
    pub fn new(cert: &Certificate) -> Result<Self> {
        Self::new_at(cert, now())
    }

    /// Summary with `valid_now` evaluated at `at`.
    pub fn new_at(cert: &Certificate, at: NaiveDateTime) -> Result<Self> {
        let spki = cert.subject_public_key_info();
        let validity = cert.validity();
        let extensions = cert.extensions();
        Ok(CertificateSummary {
            version: cert.version().to_string(),
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial_number: cert.serial_number().format_hex(),
            not_before: validity.not_before,
            not_after: validity.not_after,
            valid_now: validity.contains(at),
            signature_algorithm: cert.signature_algorithm().to_string(),
            public_key_algorithm: spki.key_algorithm()?.to_string(),
            public_key_bits: spki.key_bits()?,
            subject_alt_names: alt_names(extensions),
            key_usage: best_effort::<KeyUsage>(extensions)
                .map(|ku| ku.names().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            extended_key_usage: best_effort::<ExtendedKeyUsage>(extensions)
                .map(|eku| eku.names())
                .unwrap_or_default(),
            is_ca: best_effort::<BasicConstraints>(extensions).is_some_and(|bc| bc.ca),
            extensions: extensions.names(),
            fingerprint_sha1: fingerprint(cert.to_der(), DigestAlgorithm::Sha1),
            fingerprint_sha256: fingerprint(cert.to_der(), DigestAlgorithm::Sha256),
            self_signed: cert.is_self_signed(),
            has_unknown_critical_extensions: cert.has_unknown_critical_extensions(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    pub subject: String,
    pub public_key_algorithm: String,
    pub public_key_bits: usize,
    pub signature_algorithm: String,
    pub signature_valid: bool,
    pub subject_alt_names: Vec<String>,
    pub requested_extensions: Vec<String>,
    pub has_challenge_password: bool,
}

impl RequestSummary {
    pub fn new(csr: &CertificateRequest) -> Result<Self> {
        let spki = csr.subject_public_key_info();
        let requested = csr.requested_extensions()?;
        Ok(RequestSummary {
            subject: csr.subject().to_string(),
            public_key_algorithm: spki.key_algorithm()?.to_string(),
            public_key_bits: spki.key_bits()?,
            signature_algorithm: csr.signature_algorithm().to_string(),
            signature_valid: csr.verify().unwrap_or(false),
            subject_alt_names: alt_names(&requested),
            requested_extensions: requested.names(),
            has_challenge_password: csr
                .attributes()
                .attribute::<ChallengePassword>()
                .ok()
                .flatten()
                .is_some(),
        })
    }
}

fn best_effort<T: crate::extensions::Extension>(extensions: &Extensions) -> Option<T> {
    extensions.extension::<T>().ok().flatten()
}

fn alt_names(extensions: &Extensions) -> Vec<String> {
    best_effort::<SubjectAltName>(extensions)
        .map(|san| san.names.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}
