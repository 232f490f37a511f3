//! PKCS#9 extensionRequest attribute (OID: 1.2.840.113549.1.9.14)
//!
//! Defined in RFC 2985 Section 5.4.2
//!
//! ```asn1
//! ExtensionRequest ::= Extensions
//! Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension
//! ```
//!
//! Carries the X.509 v3 extensions a PKCS#10 request asks the CA to include.

use sslkit::decoder::Decoder;
use sslkit::encoder::Encoder;
use sslkit_asn1::Element;
use sslkit_pkix_types::Extension;

use super::{Attribute, single_value};
use crate::pkcs9::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRequest {
    extensions: Vec<Extension>,
}

impl ExtensionRequest {
    pub fn new(extensions: Vec<Extension>) -> Result<Self> {
        if extensions.is_empty() {
            return Err(Error::EmptyValue("extensionRequest"));
        }
        Ok(Self { extensions })
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn into_extensions(self) -> Vec<Extension> {
        self.extensions
    }
}

impl Attribute for ExtensionRequest {
    const OID: &'static str = "1.2.840.113549.1.9.14";

    fn parse(values: &[Element]) -> Result<Self> {
        let Element::Sequence(elements) = single_value(values, "extensionRequest")? else {
            return Err(Error::UnexpectedValue {
                name: "extensionRequest",
                expected: "SEQUENCE OF Extension",
            });
        };
        let extensions = elements
            .iter()
            .map(|e| e.decode())
            .collect::<std::result::Result<Vec<Extension>, _>>()?;
        Ok(Self { extensions })
    }

    fn to_values(&self) -> Result<Vec<Element>> {
        let extensions = self
            .extensions
            .iter()
            .map(|e| e.encode())
            .collect::<std::result::Result<Vec<Element>, _>>()?;
        Ok(vec![Element::Sequence(extensions)])
    }
}

#[cfg(test)]
mod tests {
    use sslkit_asn1::OctetString;

    use super::*;

    #[test]
    fn test_extension_request_round_trip() {
        let san = Extension::new(
            "2.5.29.17".parse().unwrap(),
            false,
            OctetString::from(vec![0x30, 0x0d, 0x82, 0x0b, b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'.', b'c', b'o', b'm']),
        );
        let bc = Extension::new(
            "2.5.29.19".parse().unwrap(),
            true,
            OctetString::from(vec![0x30, 0x00]),
        );
        let request = ExtensionRequest::new(vec![san, bc]).unwrap();
        let raw = request.to_raw().unwrap();
        let parsed: ExtensionRequest = raw.parse().unwrap();
        assert_eq!(request, parsed);
        assert!(parsed.extensions()[1].is_critical());
    }

    #[test]
    fn test_extension_request_empty() {
        assert!(ExtensionRequest::new(vec![]).is_err());
    }
}
