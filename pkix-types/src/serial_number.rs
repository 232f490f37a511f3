//! Certificate Serial Number
//!
//! Defined in RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```
//!
//! Positive, at most 20 octets. Parsing is lenient (zero, negative and
//! longer values exist in the wild); building is not.

use std::ops::Deref;

use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer};

use crate::error::{Error, Result};

const MAX_OCTETS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CertificateSerialNumber {
    inner: Integer,
}

impl Serialize for CertificateSerialNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.format_hex())
    }
}

impl CertificateSerialNumber {
    /// Serial from big-endian magnitude bytes, as generated for new
    /// certificates. Rejects zero and values longer than 20 octets.
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = Integer::from_unsigned_bytes(bytes);
        let len = inner.to_der_bytes().len();
        if inner.to_u64() == Some(0) {
            return Err(Error::InvalidCertificateSerialNumber(
                "must be positive".to_string(),
            ));
        }
        if len > MAX_OCTETS {
            return Err(Error::InvalidCertificateSerialNumber(format!(
                "{} octets exceeds {}",
                len, MAX_OCTETS
            )));
        }
        Ok(Self { inner })
    }

    /// Lowercase hex of the DER contents octets, colon separated (OpenSSL style).
    pub fn format_hex(&self) -> String {
        self.inner
            .to_der_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<Integer> for CertificateSerialNumber {
    fn from(inner: Integer) -> Self {
        Self { inner }
    }
}

impl std::fmt::Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl Deref for CertificateSerialNumber {
    type Target = Integer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        match self {
            Element::Integer(i) => Ok(CertificateSerialNumber { inner: i.clone() }),
            _ => Err(Error::expected("CertificateSerialNumber", "INTEGER")),
        }
    }
}

impl EncodableTo<CertificateSerialNumber> for Element {}

impl Encoder<CertificateSerialNumber, Element> for CertificateSerialNumber {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Integer(self.inner.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&[0x01, 0x02, 0x03], "01:02:03")]
    #[case(&[0x48, 0xc3, 0x54, 0x8e], "48:c3:54:8e")]
    #[case(&[0xf7, 0xe9], "00:f7:e9")]
    fn test_serial_format_hex(#[case] bytes: &[u8], #[case] expected: &str) {
        let serial = CertificateSerialNumber::from_unsigned_bytes(bytes).unwrap();
        assert_eq!(expected, serial.format_hex());
        assert_eq!(format!("\"{}\"", expected), serde_json::to_string(&serial).unwrap());
    }

    #[rstest]
    #[case(&[0x00])]
    #[case(&[0x7f; 21])]
    #[case(&[0x80; 20])]
    fn test_serial_rejected(#[case] bytes: &[u8]) {
        assert!(CertificateSerialNumber::from_unsigned_bytes(bytes).is_err());
    }

    #[test]
    fn test_serial_encode_decode() {
        let serial = CertificateSerialNumber::from_unsigned_bytes(&[0xaa, 0xbb, 0xcc]).unwrap();
        let encoded: Element = serial.encode().unwrap();
        let decoded: CertificateSerialNumber = encoded.decode().unwrap();
        assert_eq!(serial, decoded);
    }
}
