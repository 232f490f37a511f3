//! # sslkit-toolkit
//!
//! The engine behind an SSL/TLS toolkit front end. Every operation is a pure
//! function over bytes or text; nothing here touches files, the network or
//! the clipboard.
//!
//! | operation   | entry point                                        |
//! |-------------|----------------------------------------------------|
//! | decode      | [`decode`], [`parse_certificate`], [`parse_csr`]   |
//! | generate    | [`generate`], [`spawn`]                            |
//! | sign        | [`sign_csr`], [`self_sign`], [`issue`]             |
//! | verify      | [`verify_chain`], [`verify_chain_at`]              |
//! | convert     | [`convert`]                                        |
//! | fingerprint | [`fingerprint`]                                    |
//! | inspect     | [`inspect`]                                        |
//! | hash        | [`hash`]                                           |
//! | base64      | [`base64::encode`], [`base64::decode`]             |

#![forbid(unsafe_code)]

pub mod convert;
pub mod error;
pub mod inspect;

use std::str::FromStr;

use sslkit_pem::{FromPem, Pem};

pub use convert::{Conversion, ConversionJob, Format, convert};
pub use error::{Error, Result};
pub use inspect::{BlockSummary, KeyFormat, KeySummary, Pkcs7Summary, inspect, inspect_one};
pub use sslkit::error::{ErrorKind, Kind};
pub use sslkit_keys::{
    AbortSignal, GenerationHandle, HashAlgorithm, KeyPair, KeySpec, PublicKey, generate,
    generate_with_signal, spawn,
};
pub use sslkit_pem::base64;
pub use sslkit_pkcs::pkcs12::Pkcs12Options;
pub use sslkit_pkix_types::{DigestAlgorithm, Name, NamedCurve, SignatureAlgorithm};
pub use sslkit_x509::{
    Certificate, CertificateRequest, CertificateSummary, Extensions, RequestSummary,
    ValidationResult, ValidationStatus, Validity, fingerprint, issue, self_sign, sign_csr,
    verify_chain, verify_chain_at,
};

/// Every PEM block in `text`, in order.
pub fn decode(text: &str) -> Result<Vec<Pem>> {
    Ok(sslkit_pem::parse_many(text)?)
}

/// A certificate given as DER or as PEM text.
pub fn parse_certificate(input: &[u8]) -> Result<Certificate> {
    match pem_text(input) {
        Some(text) => Ok(Certificate::from_pem(&Pem::from_str(text)?)?),
        None => Ok(Certificate::from_der(input)?),
    }
}

/// A PKCS#10 request given as DER or as PEM text.
pub fn parse_csr(input: &[u8]) -> Result<CertificateRequest> {
    match pem_text(input) {
        Some(text) => Ok(CertificateRequest::from_pem(&Pem::from_str(text)?)?),
        None => Ok(CertificateRequest::from_der(input)?),
    }
}

fn pem_text(input: &[u8]) -> Option<&str> {
    std::str::from_utf8(input)
        .ok()
        .filter(|text| text.contains("-----BEGIN"))
}

/// Lowercase hex digest of `data`, the hash generator's output.
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> String {
    sslkit_keys::hash(algorithm, data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(HashAlgorithm::Md5, b"hello", "5d41402abc4b2a76b9719d911017c592")]
    #[case(HashAlgorithm::Sha1, b"", "da39a3ee5e6b4b0d3255bfef95601890afd80709")]
    #[case(HashAlgorithm::Sha1, b"abc", "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case(
        HashAlgorithm::Sha256,
        b"abc",
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    )]
    #[case(
        HashAlgorithm::Sha256,
        b"",
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    )]
    fn test_hash(#[case] algorithm: HashAlgorithm, #[case] data: &[u8], #[case] expected: &str) {
        assert_eq!(expected, hash(algorithm, data));
    }

    #[rstest]
    #[case(HashAlgorithm::Md5, 32)]
    #[case(HashAlgorithm::Sha384, 96)]
    #[case(HashAlgorithm::Sha512, 128)]
    fn test_hash_length(#[case] algorithm: HashAlgorithm, #[case] len: usize) {
        assert_eq!(len, hash(algorithm, b"hello world").len());
    }

    #[test]
    fn test_base64_tool() {
        let encoded = base64::encode(b"hello world");
        assert_eq!("aGVsbG8gd29ybGQ=", encoded);
        assert_eq!(b"hello world".to_vec(), base64::decode("aGVsbG8g\r\nd29ybGQ=").unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_certificate(b"garbage").is_err());
        assert!(parse_csr(&[0x30, 0x00]).is_err());
    }
}
