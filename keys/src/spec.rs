use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sslkit_pkix_types::NamedCurve;

use crate::error::{Error, Result};

pub const RSA_KEY_SIZES: [usize; 3] = [2048, 3072, 4096];

/// Algorithm and parameters of a key to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum KeySpec {
    Rsa { bits: usize },
    Ec { curve: NamedCurve },
}

impl KeySpec {
    pub fn rsa(bits: usize) -> Result<Self> {
        let spec = KeySpec::Rsa { bits };
        spec.validate()?;
        Ok(spec)
    }

    pub fn ec(curve: NamedCurve) -> Self {
        KeySpec::Ec { curve }
    }

    /// Deserialized specs are not checked until they are used.
    pub fn validate(&self) -> Result<()> {
        match self {
            KeySpec::Rsa { bits } if !RSA_KEY_SIZES.contains(bits) => {
                Err(Error::UnsupportedKeySize(*bits))
            }
            _ => Ok(()),
        }
    }
}

impl Default for KeySpec {
    fn default() -> Self {
        KeySpec::Rsa { bits: 2048 }
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Rsa { bits } => write!(f, "RSA-{}", bits),
            KeySpec::Ec { curve } => write!(f, "EC {}", curve),
        }
    }
}

/// Accepts `RSA-2048`, `rsa:4096`, `EC-P256`, `ec:P-384` or a bare curve name.
impl FromStr for KeySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let (algorithm, param) = lower
            .split_once(['-', ':', ' '])
            .unwrap_or((lower.as_str(), ""));
        match algorithm {
            "rsa" => {
                let bits = param
                    .parse()
                    .map_err(|_| Error::InvalidKeySpec(s.to_string()))?;
                KeySpec::rsa(bits)
            }
            "ec" | "ecc" | "ecdsa" => param
                .parse()
                .map(KeySpec::ec)
                .map_err(|_| Error::InvalidKeySpec(s.to_string())),
            _ => lower
                .parse()
                .map(KeySpec::ec)
                .map_err(|_| Error::InvalidKeySpec(s.to_string())),
        }
    }
}

/// Internal limits of the RSA generator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RsaGenerationConfig {
    pub miller_rabin_rounds: usize,
    pub public_exponent: u32,
}

impl Default for RsaGenerationConfig {
    fn default() -> Self {
        RsaGenerationConfig {
            miller_rabin_rounds: 64,
            public_exponent: 65537,
        }
    }
}
