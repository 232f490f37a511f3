//! Attribute containers shared by every PKCS#9 attribute type.

use std::str::FromStr;

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, ObjectIdentifier};

use crate::pkcs9::error::{Error, Result};

pub mod challenge_password;
pub mod extension_request;
pub mod friendly_name;
pub mod local_key_id;

pub use challenge_password::ChallengePassword;
pub use extension_request::ExtensionRequest;
pub use friendly_name::FriendlyName;
pub use local_key_id::LocalKeyId;

/// Raw attribute structure defined in RFC 2985
///
/// ```asn1
/// Attribute ::= SEQUENCE {
///     type    OBJECT IDENTIFIER,
///     values  SET OF AttributeValue
/// }
/// ```
///
/// Values are kept as decoded elements; unknown attribute types survive a
/// decode/encode cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    attribute_type: ObjectIdentifier,
    values: Vec<Element>,
}

impl RawAttribute {
    pub fn new(attribute_type: ObjectIdentifier, values: Vec<Element>) -> Self {
        Self {
            attribute_type,
            values,
        }
    }

    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn values(&self) -> &[Element] {
        &self.values
    }

    /// Parse the values as a specific attribute type
    pub fn parse<T: Attribute>(&self) -> Result<T> {
        if self.attribute_type != T::OID {
            return Err(Error::OidMismatch {
                expected: T::OID.to_string(),
                actual: self.attribute_type.to_string(),
            });
        }
        T::parse(&self.values)
    }
}

impl DecodableFrom<Element> for RawAttribute {}

impl Decoder<Element, RawAttribute> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RawAttribute> {
        match self.as_sequence() {
            Some([Element::ObjectIdentifier(attribute_type), Element::Set(values)]) => {
                Ok(RawAttribute {
                    attribute_type: attribute_type.clone(),
                    values: values.clone(),
                })
            }
            _ => Err(Error::InvalidAttribute(
                "expected SEQUENCE { type, SET OF value }".to_string(),
            )),
        }
    }
}

impl EncodableTo<RawAttribute> for Element {}

impl Encoder<RawAttribute, Element> for RawAttribute {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.attribute_type.clone()),
            Element::Set(self.values.clone()),
        ]))
    }
}

/// A typed PKCS#9 attribute, similar to X.509's `Extension` trait.
pub trait Attribute: Sized {
    /// The OID string for this attribute type
    const OID: &'static str;

    /// Parse the attribute values (the contents of `SET OF AttributeValue`)
    fn parse(values: &[Element]) -> Result<Self>;

    /// Values to place in the `SET OF AttributeValue`
    fn to_values(&self) -> Result<Vec<Element>>;

    fn to_raw(&self) -> Result<RawAttribute> {
        Ok(RawAttribute::new(
            ObjectIdentifier::from_str(Self::OID)?,
            self.to_values()?,
        ))
    }
}

/// The one value of a SINGLE VALUE attribute.
pub(crate) fn single_value<'a>(values: &'a [Element], name: &'static str) -> Result<&'a Element> {
    match values {
        [value] => Ok(value),
        _ => Err(Error::InvalidValueCount {
            name,
            actual: values.len(),
        }),
    }
}

/// Attributes ::= SET OF Attribute
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes(Vec<RawAttribute>);

impl Attributes {
    pub fn new(attributes: Vec<RawAttribute>) -> Self {
        Self(attributes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, oid: &str) -> Option<&RawAttribute> {
        self.0.iter().find(|attr| attr.attribute_type == oid)
    }

    /// Get and parse a specific attribute by type
    pub fn attribute<T: Attribute>(&self) -> Result<Option<T>> {
        self.get(T::OID).map(|attr| attr.parse()).transpose()
    }

    pub fn push<T: Attribute>(&mut self, attribute: &T) -> Result<()> {
        self.0.push(attribute.to_raw()?);
        Ok(())
    }

    pub fn as_slice(&self) -> &[RawAttribute] {
        &self.0
    }

    pub(crate) fn to_elements(&self) -> Result<Vec<Element>> {
        self.0.iter().map(|attr| attr.encode()).collect()
    }

    pub(crate) fn from_elements(elements: &[Element]) -> Result<Self> {
        let attributes = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<RawAttribute>>>()?;
        Ok(Attributes(attributes))
    }
}

impl From<Vec<RawAttribute>> for Attributes {
    fn from(attributes: Vec<RawAttribute>) -> Self {
        Self(attributes)
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a RawAttribute;
    type IntoIter = std::slice::Iter<'a, RawAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl DecodableFrom<Element> for Attributes {}

/// Accepts a plain SET as well as the `[0] IMPLICIT` form used by PKCS#8 and
/// PKCS#10.
impl Decoder<Element, Attributes> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Attributes> {
        match self {
            Element::Set(elements) | Element::ContextSpecific { elements, .. } => {
                Attributes::from_elements(elements)
            }
            _ => Err(Error::InvalidAttribute("Attributes must be a SET".into())),
        }
    }
}

impl EncodableTo<Attributes> for Element {}

impl Encoder<Attributes, Element> for Attributes {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Set(self.to_elements()?))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_unknown_attribute_is_kept() {
        let element = Element::Sequence(vec![
            Element::ObjectIdentifier("1.2.3.4".parse().unwrap()),
            Element::Set(vec![Element::Integer(7u32.into()), Element::Null]),
        ]);
        let attr: RawAttribute = element.decode().unwrap();
        assert_eq!(2, attr.values().len());
        let back: Element = attr.encode().unwrap();
        assert_eq!(element, back);
    }

    #[rstest]
    #[case(Element::Set(vec![]))]
    #[case(Element::ContextSpecific { slot: 0, elements: vec![] })]
    fn test_empty_attributes(#[case] element: Element) {
        let attributes: Attributes = element.decode().unwrap();
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_attributes_lookup_and_oid_mismatch() {
        let mut attributes = Attributes::default();
        attributes.push(&LocalKeyId::new(vec![1, 2, 3])).unwrap();
        attributes.push(&FriendlyName::new("key").unwrap()).unwrap();
        assert_eq!(2, attributes.len());

        let id: LocalKeyId = attributes.attribute().unwrap().unwrap();
        assert_eq!(&[1, 2, 3], id.as_bytes());
        assert!(attributes.attribute::<ChallengePassword>().unwrap().is_none());

        let err = attributes.as_slice()[0].parse::<FriendlyName>().unwrap_err();
        assert!(matches!(err, Error::OidMismatch { .. }));
    }

    #[test]
    fn test_single_value_count() {
        let values = vec![Element::Null, Element::Null];
        assert!(matches!(
            single_value(&values, "x"),
            Err(Error::InvalidValueCount { actual: 2, .. })
        ));
    }
}
