//! PKCS#9 friendlyName attribute (OID: 1.2.840.113549.1.9.20)
//!
//! Defined in RFC 2985 Section 5.5.1
//!
//! ```asn1
//! friendlyName ATTRIBUTE ::= {
//!     WITH SYNTAX BMPString (SIZE(1..pkcs-9-ub-friendlyName))
//!     SINGLE VALUE TRUE
//!     ID pkcs-9-at-friendlyName
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sslkit_asn1::Element;

use super::{Attribute, single_value};
use crate::pkcs9::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendlyName {
    name: String,
}

impl FriendlyName {
    /// pkcs-9-ub-friendlyName
    const MAX_LENGTH: usize = 255;

    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyValue("friendlyName"));
        }
        let len = name.chars().count();
        if len > Self::MAX_LENGTH {
            return Err(Error::ValueTooLong {
                max: Self::MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FriendlyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Attribute for FriendlyName {
    const OID: &'static str = "1.2.840.113549.1.9.20";

    fn parse(values: &[Element]) -> Result<Self> {
        match single_value(values, "friendlyName")? {
            Element::BMPString(name) => Self::new(name.clone()),
            _ => Err(Error::UnexpectedValue {
                name: "friendlyName",
                expected: "BMPString",
            }),
        }
    }

    fn to_values(&self) -> Result<Vec<Element>> {
        Ok(vec![Element::BMPString(self.name.clone())])
    }
}
