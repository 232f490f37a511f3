//! Producing signed requests and certificates.
//!
//! Everything signed here is assembled as a typed structure, encoded once,
//! signed over that encoding and then parsed back, so the returned values
//! carry exactly the bytes that were signed.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use rand_core::{CryptoRng, OsRng, RngCore};
use sslkit::encoder::Encoder;
use sslkit_keys::KeyPair;
use sslkit_pkcs::pkcs9::{Attributes, ExtensionRequest};
use sslkit_pkix_types::{CertificateSerialNumber, Name, SubjectPublicKeyInfo};
use tracing::debug;

use crate::certificate::{Certificate, TbsCertificate, Validity, Version, signed_der};
use crate::error::{Error, Result};
use crate::extensions::{AuthorityKeyIdentifier, Extension, Extensions, SubjectKeyIdentifier};
use crate::request::{CertificateRequest, CertificationRequestInfo};

const SERIAL_NUMBER_LEN: usize = 20;

/// Current UTC time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Utc::now().trunc_subsecs(0).naive_utc()
}

/// 20 random octets with the high bit cleared, so the DER INTEGER stays
/// positive without a padding octet.
pub fn random_serial_number<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<CertificateSerialNumber> {
    let mut bytes = [0u8; SERIAL_NUMBER_LEN];
    rng.try_fill_bytes(&mut bytes).map_err(Error::Entropy)?;
    bytes[0] &= 0x7f;
    if bytes[0] == 0 {
        bytes[0] = 0x01;
    }
    Ok(CertificateSerialNumber::from_unsigned_bytes(&bytes)?)
}

fn sign_tbs(tbs: &TbsCertificate, key: &KeyPair) -> Result<Certificate> {
    let element = tbs.encode()?;
    let signature = key.sign(tbs.signature, &element.to_der()?)?;
    Certificate::from_der(&signed_der(element, tbs.signature, signature)?)
}

fn ensure_key_matches(spki: &SubjectPublicKeyInfo, key: &KeyPair) -> Result<()> {
    if key.subject_public_key_info()? != *spki {
        return Err(Error::KeyMismatch);
    }
    Ok(())
}

/// Builds and signs a PKCS#10 request.
///
/// `spki` must be the public half of `key`. Non-empty `extensions` are
/// carried in an extensionRequest attribute.
pub fn sign_csr(
    subject: &Name,
    spki: &SubjectPublicKeyInfo,
    key: &KeyPair,
    extensions: &Extensions,
) -> Result<CertificateRequest> {
    ensure_key_matches(spki, key)?;

    let mut attributes = Attributes::default();
    if !extensions.is_empty() {
        let request =
            ExtensionRequest::new(extensions.iter().cloned().map(Into::into).collect())?;
        attributes.push(&request)?;
    }
    let info = CertificationRequestInfo {
        subject: subject.clone(),
        subject_public_key_info: spki.clone(),
        attributes,
    };

    let algorithm = key.signature_algorithm();
    let element = info.encode()?;
    let signature = key.sign(algorithm, &element.to_der()?)?;
    debug!(%subject, %algorithm, extensions = extensions.len(), "signed certificate request");
    CertificateRequest::from_der(&signed_der(element, algorithm, signature)?)
}

/// Self-signed certificate valid for `validity_days` from now.
pub fn self_sign(
    subject: &Name,
    key: &KeyPair,
    validity_days: u32,
    extensions: &Extensions,
) -> Result<Certificate> {
    let validity = Validity::for_days(now(), validity_days)?;
    self_sign_with_validity(subject, key, validity, extensions, &mut OsRng)
}

/// Self-signed certificate with an explicit validity window.
///
/// A subject key identifier is added when absent, and the authority key
/// identifier points at it.
pub fn self_sign_with_validity<R: RngCore + CryptoRng>(
    subject: &Name,
    key: &KeyPair,
    validity: Validity,
    extensions: &Extensions,
    rng: &mut R,
) -> Result<Certificate> {
    if validity.not_after < validity.not_before {
        return Err(Error::InvalidValidity(
            "notAfter precedes notBefore".to_string(),
        ));
    }
    let spki = key.subject_public_key_info()?;
    let mut extensions = extensions.clone();
    let ski = match extensions.extension::<SubjectKeyIdentifier>()? {
        Some(ski) => ski,
        None => {
            let ski = SubjectKeyIdentifier::from_spki(&spki);
            extensions.push(&ski, false)?;
            ski
        }
    };
    if extensions.get(AuthorityKeyIdentifier::OID).is_none() {
        extensions.push(
            &AuthorityKeyIdentifier::from_key_identifier(ski.key_identifier),
            false,
        )?;
    }

    let tbs = TbsCertificate {
        version: Version::V3,
        serial_number: random_serial_number(rng)?,
        signature: key.signature_algorithm(),
        issuer: subject.clone(),
        validity,
        subject: subject.clone(),
        subject_public_key_info: spki,
        extensions,
    };
    debug!(%subject, serial = %tbs.serial_number, algorithm = %tbs.signature, "self-signing certificate");
    sign_tbs(&tbs, key)
}

/// Issues a certificate for `csr` signed by `ca_key` as `ca_cert`.
///
/// Extensions requested in the CSR come first; `extensions` override
/// requested ones with the same OID.
pub fn issue(
    csr: &CertificateRequest,
    ca_cert: &Certificate,
    ca_key: &KeyPair,
    validity_days: u32,
    extensions: &Extensions,
) -> Result<Certificate> {
    let validity = Validity::for_days(now(), validity_days)?;
    issue_with_validity(csr, ca_cert, ca_key, validity, extensions, &mut OsRng)
}

pub fn issue_with_validity<R: RngCore + CryptoRng>(
    csr: &CertificateRequest,
    ca_cert: &Certificate,
    ca_key: &KeyPair,
    validity: Validity,
    extensions: &Extensions,
    rng: &mut R,
) -> Result<Certificate> {
    if !csr.verify()? {
        return Err(Error::InvalidRequestSignature);
    }
    ensure_key_matches(ca_cert.subject_public_key_info(), ca_key)?;

    let mut combined = csr.requested_extensions()?;
    extensions
        .iter()
        .cloned()
        .for_each(|ext| combined.push_raw(ext));
    if combined.get(SubjectKeyIdentifier::OID).is_none() {
        combined.push(
            &SubjectKeyIdentifier::from_spki(csr.subject_public_key_info()),
            false,
        )?;
    }
    let authority_key_id = match ca_cert.extension::<SubjectKeyIdentifier>()? {
        Some(ski) => ski,
        None => SubjectKeyIdentifier::from_spki(ca_cert.subject_public_key_info()),
    };
    combined.push(
        &AuthorityKeyIdentifier::from_key_identifier(authority_key_id.key_identifier),
        false,
    )?;

    let tbs = TbsCertificate {
        version: Version::V3,
        serial_number: random_serial_number(rng)?,
        signature: ca_key.signature_algorithm(),
        issuer: ca_cert.subject().clone(),
        validity,
        subject: csr.subject().clone(),
        subject_public_key_info: csr.subject_public_key_info().clone(),
        extensions: combined,
    };
    debug!(
        subject = %tbs.subject,
        issuer = %tbs.issuer,
        serial = %tbs.serial_number,
        "issuing certificate"
    );
    sign_tbs(&tbs, ca_key)
}
