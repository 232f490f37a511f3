//! PKCS#9 localKeyId attribute (OID: 1.2.840.113549.1.9.21)
//!
//! ```asn1
//! localKeyId ATTRIBUTE ::= {
//!     WITH SYNTAX OCTET STRING
//!     SINGLE VALUE TRUE
//!     ID pkcs-9-at-localKeyId
//! }
//! ```
//!
//! PKCS#12 uses it to pair a key bag with its certificate bag.

use sslkit_asn1::{Element, OctetString};
use sslkit_pkix_types::KeyIdentifier;

use super::{Attribute, single_value};
use crate::pkcs9::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalKeyId(KeyIdentifier);

impl LocalKeyId {
    pub fn new(id: Vec<u8>) -> Self {
        LocalKeyId(KeyIdentifier::new(id))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for LocalKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Attribute for LocalKeyId {
    const OID: &'static str = "1.2.840.113549.1.9.21";

    fn parse(values: &[Element]) -> Result<Self> {
        match single_value(values, "localKeyId")? {
            Element::OctetString(id) => Ok(LocalKeyId::new(id.as_bytes().to_vec())),
            _ => Err(Error::UnexpectedValue {
                name: "localKeyId",
                expected: "OCTET STRING",
            }),
        }
    }

    fn to_values(&self) -> Result<Vec<Element>> {
        Ok(vec![Element::OctetString(OctetString::from(self.as_bytes()))])
    }
}
