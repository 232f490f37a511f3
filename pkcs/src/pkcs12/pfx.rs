//! ```asn1
//! PFX ::= SEQUENCE {
//!     version  INTEGER {v3(3)}(v3,...),
//!     authSafe ContentInfo,
//!     macData  MacData OPTIONAL
//! }
//!
//! AuthenticatedSafe ::= SEQUENCE OF ContentInfo
//!
//! EncryptedData ::= SEQUENCE {
//!     version              Version,
//!     encryptedContentInfo EncryptedContentInfo
//! }
//!
//! EncryptedContentInfo ::= SEQUENCE {
//!     contentType                ContentType,
//!     contentEncryptionAlgorithm ContentEncryptionAlgorithmIdentifier,
//!     encryptedContent           [0] IMPLICIT EncryptedContent OPTIONAL
//! }
//! ```

use std::fmt;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sslkit::decoder::Decoder;
use sslkit::encoder::Encoder;
use sslkit_asn1::{Element, Integer, OctetString};
use sslkit_pkix_types::AlgorithmIdentifier;
use tracing::debug;
use zeroize::Zeroizing;

use super::bags::{BagValue, SafeBag, decode_safe_contents, encode_safe_contents};
use super::error::{Error, Result};
use super::mac::MacData;
use crate::pkcs7::{ContentInfo, OID_DATA, OID_ENCRYPTED_DATA};
use crate::pkcs8::{self, EncryptedPrivateKeyInfo, Pbes2Params, PrivateKeyInfo};
use crate::pkcs9::{FriendlyName, LocalKeyId};

const PFX_VERSION: i64 = 3;
const MAC_SALT_LEN: usize = 16;

/// Parameters for building a PFX.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pkcs12Options {
    /// PBKDF2 iterations for bag encryption
    pub iterations: u32,
    pub mac_iterations: u32,
    /// friendlyName attached to the key bag and the first certificate bag
    pub friendly_name: Option<String>,
}

impl Default for Pkcs12Options {
    fn default() -> Self {
        Pkcs12Options {
            iterations: 2048,
            mac_iterations: 2048,
            friendly_name: None,
        }
    }
}

/// What a PFX carries once opened.
#[derive(Clone, Default)]
pub struct Bundle {
    /// Certificate DER in bag order
    pub certificates: Vec<Vec<u8>>,
    /// PrivateKeyInfo DER
    pub private_key: Option<Zeroizing<Vec<u8>>>,
    pub friendly_name: Option<String>,
    pub local_key_id: Option<Vec<u8>>,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("certificates", &self.certificates.len())
            .field("private_key", &self.private_key.is_some())
            .field("friendly_name", &self.friendly_name)
            .field("local_key_id", &self.local_key_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pfx {
    // AuthenticatedSafe DER, the MAC input
    auth_safe: Vec<u8>,
    mac_data: Option<MacData>,
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::PasswordRequired);
    }
    Ok(())
}

fn map_pkcs8(err: pkcs8::Error) -> Error {
    match err {
        pkcs8::Error::IncorrectPassword => Error::IncorrectPassword,
        err => Error::Pkcs8(err),
    }
}

fn data_content_info(safe_contents: Vec<u8>) -> Result<Element> {
    let content_info = ContentInfo::new(
        OID_DATA,
        Some(Element::OctetString(OctetString::from(safe_contents))),
    )?;
    Ok(content_info.encode()?)
}

fn encrypted_content_info(safe_contents: &[u8], password: &str, iterations: u32) -> Result<Element> {
    let params = Pbes2Params::new(iterations)?;
    let ciphertext = params.encrypt(password.as_bytes(), safe_contents)?;
    let encrypted_data = Element::Sequence(vec![
        Element::Integer(Integer::from(0u32)),
        Element::Sequence(vec![
            Element::ObjectIdentifier(OID_DATA.parse()?),
            params.to_identifier()?.encode()?,
            Element::Implicit {
                slot: 0,
                data: ciphertext,
            },
        ]),
    ]);
    let content_info = ContentInfo::new(OID_ENCRYPTED_DATA, Some(encrypted_data))?;
    Ok(content_info.encode()?)
}

fn decrypt_content(encrypted_data: &Element, password: &str) -> Result<Zeroizing<Vec<u8>>> {
    let Some([Element::Integer(_), encrypted_content_info]) = encrypted_data.as_sequence() else {
        return Err(Error::InvalidStructure("EncryptedData must be a SEQUENCE"));
    };
    let (algorithm, ciphertext) = match encrypted_content_info.as_sequence() {
        Some([Element::ObjectIdentifier(_), algorithm, Element::Implicit { slot: 0, data }]) => {
            (algorithm, data.clone())
        }
        Some(
            [
                Element::ObjectIdentifier(_),
                algorithm,
                Element::ContextSpecific { slot: 0, elements },
            ],
        ) => {
            let mut data = Vec::new();
            for chunk in elements {
                match chunk {
                    Element::OctetString(octets) => data.extend_from_slice(octets.as_bytes()),
                    _ => return Err(Error::InvalidStructure("encryptedContent chunk")),
                }
            }
            (algorithm, data)
        }
        _ => return Err(Error::InvalidStructure("EncryptedContentInfo without content")),
    };
    let algorithm: AlgorithmIdentifier = algorithm.decode()?;
    let params = Pbes2Params::from_identifier(&algorithm).map_err(map_pkcs8)?;
    params
        .decrypt(password.as_bytes(), &ciphertext)
        .map_err(map_pkcs8)
}

impl Pfx {
    /// Builds a password-protected PFX.
    ///
    /// Certificates go into one PBES2-encrypted SafeContents, the key into a
    /// PKCS8ShroudedKeyBag. Both the key bag and the first certificate bag
    /// carry `localKeyId` = SHA-1 of the first certificate.
    pub fn seal(
        certificates: &[Vec<u8>],
        private_key: Option<&[u8]>,
        password: &str,
        options: &Pkcs12Options,
    ) -> Result<Self> {
        require_password(password)?;
        if options.iterations == 0 || options.mac_iterations == 0 {
            return Err(Error::InvalidOptions("iteration counts must be positive"));
        }
        if let Some(key) = private_key {
            PrivateKeyInfo::from_der(key)?;
        }

        let local_key_id = certificates
            .first()
            .map(|cert| LocalKeyId::new(Sha1::digest(cert).to_vec()));
        let friendly_name = options
            .friendly_name
            .as_deref()
            .map(FriendlyName::new)
            .transpose()?;

        let tag = |mut bag: SafeBag| -> Result<SafeBag> {
            if let Some(id) = &local_key_id {
                bag = bag.with_attribute(id)?;
            }
            if let Some(name) = &friendly_name {
                bag = bag.with_attribute(name)?;
            }
            Ok(bag)
        };

        let mut auth_safe = Vec::new();
        if !certificates.is_empty() {
            let bags = certificates
                .iter()
                .enumerate()
                .map(|(i, cert)| {
                    let bag = SafeBag::new(BagValue::Certificate(cert.clone()));
                    if i == 0 { tag(bag) } else { Ok(bag) }
                })
                .collect::<Result<Vec<_>>>()?;
            let safe_contents = encode_safe_contents(&bags)?;
            auth_safe.push(encrypted_content_info(
                &safe_contents,
                password,
                options.iterations,
            )?);
        }
        if let Some(key) = private_key {
            let params = Pbes2Params::new(options.iterations)?;
            let shrouded = EncryptedPrivateKeyInfo::encrypt(key, password.as_bytes(), &params)?;
            let bag = tag(SafeBag::new(BagValue::ShroudedKey(shrouded)))?;
            auth_safe.push(data_content_info(encode_safe_contents(&[bag])?)?);
        }
        let auth_safe = Element::Sequence(auth_safe).to_der()?;

        let mut salt = vec![0u8; MAC_SALT_LEN];
        OsRng.try_fill_bytes(&mut salt).map_err(Error::Entropy)?;
        let mac_data = MacData::compute(&auth_safe, password, salt, options.mac_iterations)?;

        debug!(
            certificates = certificates.len(),
            key = private_key.is_some(),
            iterations = options.iterations,
            "sealed PKCS#12"
        );
        Ok(Pfx {
            auth_safe,
            mac_data: Some(mac_data),
        })
    }

    pub fn has_mac(&self) -> bool {
        self.mac_data.is_some()
    }

    pub fn mac_data(&self) -> Option<&MacData> {
        self.mac_data.as_ref()
    }

    /// Verifies the MAC, then decrypts every bag.
    pub fn open(&self, password: &str) -> Result<Bundle> {
        require_password(password)?;
        if let Some(mac_data) = &self.mac_data {
            mac_data.verify(&self.auth_safe, password)?;
        }

        let content_infos = match Element::from_der(&self.auth_safe)? {
            Element::Sequence(content_infos) => content_infos,
            _ => return Err(Error::InvalidStructure("AuthenticatedSafe must be a SEQUENCE")),
        };

        let mut bags = Vec::new();
        for content_info in &content_infos {
            let content_info: ContentInfo = content_info.decode()?;
            let content = content_info
                .content
                .as_ref()
                .ok_or(Error::InvalidStructure("ContentInfo without content"))?;
            if content_info.is(OID_DATA) {
                let Element::OctetString(safe_contents) = content else {
                    return Err(Error::InvalidStructure("data content must be an OCTET STRING"));
                };
                bags.extend(decode_safe_contents(safe_contents.as_bytes())?);
            } else if content_info.is(OID_ENCRYPTED_DATA) {
                let safe_contents = decrypt_content(content, password)?;
                match decode_safe_contents(&safe_contents) {
                    Ok(decrypted) => bags.extend(decrypted),
                    // Without a MAC, garbage plaintext is the only sign of a wrong password.
                    Err(_) if !self.has_mac() => return Err(Error::IncorrectPassword),
                    Err(e) => return Err(e),
                }
            } else {
                return Err(Error::UnsupportedContentType(
                    content_info.content_type.to_string(),
                ));
            }
        }
        debug!(bags = bags.len(), "opened PKCS#12");

        let mut bundle = Bundle::default();
        let mut labelled: Option<&SafeBag> = None;
        for bag in &bags {
            let key = match &bag.value {
                BagValue::Certificate(der) => {
                    bundle.certificates.push(der.clone());
                    if labelled.is_none() {
                        labelled = Some(bag);
                    }
                    continue;
                }
                BagValue::ShroudedKey(shrouded) => shrouded
                    .decrypt(password.as_bytes())
                    .map_err(map_pkcs8)?,
                BagValue::Key(der) => der.clone(),
                BagValue::Other { bag_id, .. } => {
                    debug!(%bag_id, "skipping PKCS#12 bag");
                    continue;
                }
            };
            if bundle.private_key.is_some() {
                return Err(Error::MultipleKeys);
            }
            bundle.private_key = Some(key);
            labelled = Some(bag);
        }
        if let Some(bag) = labelled {
            bundle.friendly_name = bag.friendly_name()?;
            bundle.local_key_id = bag.local_key_id()?;
        }
        Ok(bundle)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let element = Element::from_der(der)?;
        let (version, auth_safe, mac_data) = match element.as_sequence() {
            Some([Element::Integer(version), auth_safe]) => (version, auth_safe, None),
            Some([Element::Integer(version), auth_safe, mac_data]) => {
                (version, auth_safe, Some(mac_data))
            }
            _ => return Err(Error::InvalidStructure("PFX must be a SEQUENCE")),
        };
        let version = version.to_i64().unwrap_or(-1);
        if version != PFX_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let auth_safe: ContentInfo = auth_safe.decode()?;
        if !auth_safe.is(OID_DATA) {
            return Err(Error::UnsupportedContentType(auth_safe.content_type.to_string()));
        }
        let Some(Element::OctetString(auth_safe)) = auth_safe.content else {
            return Err(Error::InvalidStructure("authSafe must hold an OCTET STRING"));
        };
        let mac_data = mac_data.map(|m| m.decode()).transpose()?;
        Ok(Pfx {
            auth_safe: auth_safe.into_bytes(),
            mac_data,
        })
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let mut elements = vec![
            Element::Integer(Integer::from(PFX_VERSION)),
            data_content_info(self.auth_safe.clone())?,
        ];
        if let Some(mac_data) = &self.mac_data {
            elements.push(mac_data.encode()?);
        }
        Ok(Element::Sequence(elements).to_der()?)
    }
}
