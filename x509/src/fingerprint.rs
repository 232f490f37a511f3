use sslkit_keys::digest::digest;
use sslkit_pkix_types::DigestAlgorithm;

/// Hash of the complete DER encoding as lowercase colon-separated hex.
pub fn fingerprint(der: &[u8], algorithm: DigestAlgorithm) -> String {
    digest(algorithm, der)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::certificate::Certificate;
    use crate::test_fixtures::{EC_CA_PEM, ROOT_CA_PEM};

    #[rstest]
    #[case(DigestAlgorithm::Sha1, 20)]
    #[case(DigestAlgorithm::Sha256, 32)]
    #[case(DigestAlgorithm::Sha384, 48)]
    #[case(DigestAlgorithm::Sha512, 64)]
    fn test_fingerprint_shape(#[case] algorithm: DigestAlgorithm, #[case] groups: usize) {
        let cert = Certificate::from_str(ROOT_CA_PEM).unwrap();
        let fp = fingerprint(cert.to_der(), algorithm);
        let parts = fp.split(':').collect::<Vec<_>>();
        assert_eq!(groups, parts.len());
        assert!(parts.iter().all(|p| p.len() == 2
            && p.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))));
    }

    #[test]
    fn test_fingerprint_empty_input() {
        assert_eq!(
            "da:39:a3:ee:5e:6b:4b:0d:32:55:bf:ef:95:60:18:90:af:d8:07:09",
            fingerprint(&[], DigestAlgorithm::Sha1)
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_certificates() {
        let a = Certificate::from_str(ROOT_CA_PEM).unwrap();
        let b = Certificate::from_str(EC_CA_PEM).unwrap();
        assert_ne!(
            fingerprint(a.to_der(), DigestAlgorithm::Sha256),
            fingerprint(b.to_der(), DigestAlgorithm::Sha256)
        );
    }
}
