use std::fmt;

use serde::{Deserialize, Serialize};

/// KeyIdentifier ::= OCTET STRING
///
/// Used by the subject/authority key identifier extensions and by the
/// PKCS#9 localKeyId attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyIdentifier(Vec<u8>);

impl KeyIdentifier {
    pub fn new(bytes: Vec<u8>) -> Self {
        KeyIdentifier(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self
            .0
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":");
        write!(f, "{}", hex)
    }
}
