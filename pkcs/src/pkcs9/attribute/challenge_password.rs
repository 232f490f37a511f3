//! PKCS#9 challengePassword attribute (OID: 1.2.840.113549.1.9.7)
//!
//! ```asn1
//! challengePassword ATTRIBUTE ::= {
//!     WITH SYNTAX DirectoryString {pkcs-9-ub-challengePassword}
//!     SINGLE VALUE TRUE
//!     ID pkcs-9-at-challengePassword
//! }
//! ```

use sslkit::decoder::Decoder;
use sslkit::encoder::Encoder;
use sslkit_asn1::Element;
use sslkit_pkix_types::{DirectoryString, StringKind};

use super::{Attribute, single_value};
use crate::pkcs9::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengePassword(DirectoryString);

impl ChallengePassword {
    /// pkcs-9-ub-challengePassword
    const MAX_LENGTH: usize = 255;

    /// PrintableString when possible, UTF8String otherwise.
    pub fn new(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::EmptyValue("challengePassword"));
        }
        if password.len() > Self::MAX_LENGTH {
            return Err(Error::ValueTooLong {
                max: Self::MAX_LENGTH,
                actual: password.len(),
            });
        }
        let printable = password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c));
        let kind = if printable {
            StringKind::Printable
        } else {
            StringKind::Utf8
        };
        Ok(ChallengePassword(DirectoryString::new(kind, password)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Attribute for ChallengePassword {
    const OID: &'static str = "1.2.840.113549.1.9.7";

    fn parse(values: &[Element]) -> Result<Self> {
        let value: DirectoryString = single_value(values, "challengePassword")?.decode()?;
        Ok(ChallengePassword(value))
    }

    fn to_values(&self) -> Result<Vec<Element>> {
        Ok(vec![self.0.encode()?])
    }
}
