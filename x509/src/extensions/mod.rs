use std::str::FromStr;

use serde::Serialize;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier, OctetString};
use sslkit_pkix_types::OidName;

mod authority_key_identifier;
mod basic_constraints;
pub mod error;
mod extended_key_usage;
mod general_name;
mod key_usage;
mod subject_alt_name;
mod subject_key_identifier;

pub use authority_key_identifier::AuthorityKeyIdentifier;
pub use basic_constraints::BasicConstraints;
pub use error::{Error, Result};
pub use extended_key_usage::ExtendedKeyUsage;
pub use general_name::GeneralName;
pub use key_usage::KeyUsage;
pub use subject_alt_name::SubjectAltName;
pub use subject_key_identifier::SubjectKeyIdentifier;

/// Trait for typed X.509 extensions.
///
/// Implementors convert between the DER carried in `extnValue` and a typed
/// view. Anything without an implementor stays a [`RawExtension`].
pub trait Extension: Sized {
    /// The OID of this extension type as a string (e.g., "2.5.29.19" for BasicConstraints)
    const OID: &'static str;

    /// Parse the contents of the extension's OCTET STRING.
    fn parse(value: &OctetString) -> Result<Self>;

    /// DER for the extension's OCTET STRING.
    fn to_value(&self) -> Result<OctetString>;

    fn oid() -> Result<ObjectIdentifier> {
        Ok(ObjectIdentifier::from_str(Self::OID)?)
    }

    fn to_raw(&self, critical: bool) -> Result<RawExtension> {
        Ok(RawExtension(sslkit_pkix_types::Extension::new(
            Self::oid()?,
            critical,
            self.to_value()?,
        )))
    }
}

/// The single DER element inside an extension value.
pub(crate) fn value_element(value: &OctetString) -> Result<Element> {
    Ok(Element::from_der(value.as_bytes())?)
}

pub(crate) fn element_value(element: &Element) -> Result<OctetString> {
    Ok(OctetString::from(element.to_der()?))
}

/// Raw X.509 extension before type-specific parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtension(sslkit_pkix_types::Extension);

impl RawExtension {
    pub fn new(oid: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self(sslkit_pkix_types::Extension::new(oid, critical, value))
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        self.0.oid()
    }

    pub fn critical(&self) -> bool {
        self.0.is_critical()
    }

    pub fn value(&self) -> &OctetString {
        self.0.value()
    }

    /// Parse the extension value as a specific extension type
    pub fn parse<T: Extension>(&self) -> Result<T> {
        if *self.oid() != T::OID {
            return Err(Error::OidMismatch {
                expected: T::OID.to_string(),
                actual: self.oid().to_string(),
            });
        }
        T::parse(self.value())
    }

    /// `None` for extensions without a typed view, otherwise whether the
    /// value parses.
    fn parses(&self) -> Option<bool> {
        let ok = match self.oid().to_string().as_str() {
            BasicConstraints::OID => self.parse::<BasicConstraints>().is_ok(),
            KeyUsage::OID => self.parse::<KeyUsage>().is_ok(),
            ExtendedKeyUsage::OID => self.parse::<ExtendedKeyUsage>().is_ok(),
            SubjectKeyIdentifier::OID => self.parse::<SubjectKeyIdentifier>().is_ok(),
            AuthorityKeyIdentifier::OID => self.parse::<AuthorityKeyIdentifier>().is_ok(),
            SubjectAltName::OID => self.parse::<SubjectAltName>().is_ok(),
            _ => return None,
        };
        Some(ok)
    }

    /// Critical and either without a typed view or failing to parse.
    pub fn is_unhandled_critical(&self) -> bool {
        self.critical() && self.parses() != Some(true)
    }
}

impl OidName for RawExtension {
    fn oid_name(&self) -> Option<&'static str> {
        match self.oid().to_string().as_str() {
            SubjectKeyIdentifier::OID => Some("subjectKeyIdentifier"),
            KeyUsage::OID => Some("keyUsage"),
            SubjectAltName::OID => Some("subjectAltName"),
            BasicConstraints::OID => Some("basicConstraints"),
            AuthorityKeyIdentifier::OID => Some("authorityKeyIdentifier"),
            ExtendedKeyUsage::OID => Some("extKeyUsage"),
            // Recognized by name only; kept opaque
            "2.5.29.18" => Some("issuerAltName"),
            "2.5.29.30" => Some("nameConstraints"),
            "2.5.29.31" => Some("cRLDistributionPoints"),
            "2.5.29.32" => Some("certificatePolicies"),
            "1.3.6.1.5.5.7.1.1" => Some("authorityInfoAccess"),
            "1.3.6.1.4.1.11129.2.4.2" => Some("ctPrecertificateSCTs"),
            _ => None,
        }
    }
}

impl Serialize for RawExtension {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Extension", 3)?;
        state.serialize_field("oid", self.oid())?;
        state.serialize_field("name", &self.oid_name())?;
        state.serialize_field("critical", &self.critical())?;
        state.end()
    }
}

impl From<sslkit_pkix_types::Extension> for RawExtension {
    fn from(ext: sslkit_pkix_types::Extension) -> Self {
        Self(ext)
    }
}

impl From<RawExtension> for sslkit_pkix_types::Extension {
    fn from(ext: RawExtension) -> Self {
        ext.0
    }
}

impl AsRef<sslkit_pkix_types::Extension> for RawExtension {
    fn as_ref(&self) -> &sslkit_pkix_types::Extension {
        &self.0
    }
}

impl DecodableFrom<Element> for RawExtension {}

impl Decoder<Element, RawExtension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RawExtension> {
        let ext: sslkit_pkix_types::Extension = self.decode()?;
        Ok(RawExtension(ext))
    }
}

impl EncodableTo<RawExtension> for Element {}

impl Encoder<RawExtension, Element> for RawExtension {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.0.encode()?)
    }
}

/*
RFC 5280 Section 4.1.2.9

Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
*/

/// Ordered, OID-keyed collection of X.509 v3 extensions.
///
/// Unknown extensions are kept verbatim in their original position so
/// re-encoding reproduces them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Extensions {
    extensions: Vec<RawExtension>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawExtension> {
        self.extensions.iter()
    }

    /// Appends a typed extension, replacing any earlier one with the same OID.
    pub fn push<T: Extension>(&mut self, extension: &T, critical: bool) -> Result<()> {
        self.push_raw(extension.to_raw(critical)?);
        Ok(())
    }

    pub fn push_raw(&mut self, extension: RawExtension) {
        self.extensions.retain(|ext| ext.oid() != extension.oid());
        self.extensions.push(extension);
    }

    pub fn get(&self, oid: &str) -> Option<&RawExtension> {
        self.extensions.iter().find(|ext| *ext.oid() == oid)
    }

    /// Get and parse a specific extension by type
    pub fn extension<T: Extension>(&self) -> Result<Option<T>> {
        self.get(T::OID).map(|ext| ext.parse::<T>()).transpose()
    }

    pub fn has_unknown_critical(&self) -> bool {
        self.extensions.iter().any(RawExtension::is_unhandled_critical)
    }

    /// Conventional names, falling back to the dotted OID.
    pub fn names(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| {
                ext.oid_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| ext.oid().to_string())
            })
            .collect()
    }
}

impl From<Vec<RawExtension>> for Extensions {
    fn from(extensions: Vec<RawExtension>) -> Self {
        Self { extensions }
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = &'a RawExtension;
    type IntoIter = std::slice::Iter<'a, RawExtension>;

    fn into_iter(self) -> Self::IntoIter {
        self.extensions.iter()
    }
}

impl DecodableFrom<Element> for Extensions {}

/// Accepts the bare SEQUENCE as well as the `[3] EXPLICIT` wrapper of a
/// TBSCertificate.
impl Decoder<Element, Extensions> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extensions> {
        let elements = match self {
            Element::ContextSpecific { slot: 3, elements } => match elements.as_slice() {
                [Element::Sequence(inner)] => inner,
                _ => return Err(Error::ExpectedSequence(error::Kind::Extensions)),
            },
            Element::Sequence(elements) => elements,
            _ => return Err(Error::ExpectedSequence(error::Kind::Extensions)),
        };
        if elements.is_empty() {
            return Err(Error::EmptySequence(error::Kind::Extensions));
        }
        let extensions = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<RawExtension>>>()?;
        Ok(Extensions { extensions })
    }
}

impl EncodableTo<Extensions> for Element {}

impl Encoder<Extensions, Element> for Extensions {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        if self.extensions.is_empty() {
            return Err(Error::EmptySequence(error::Kind::Extensions));
        }
        let elements = self
            .extensions
            .iter()
            .map(|ext| ext.encode())
            .collect::<Result<Vec<Element>>>()?;
        Ok(Element::Sequence(elements))
    }
}
