//! ASN.1 element model over DER TLVs.
//!
//! Covers the universal types X.509 and the PKCS family use. Anything else
//! (application or private class tags, unlisted universal tags) is kept as
//! [`Element::Raw`] and re-encoded verbatim.

use chrono::{Datelike, NaiveDateTime};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_der::{Der, Tag, TagClass, Tlv, Value};

pub mod error;
mod oid;
mod time;

use error::Error;
pub use oid::ObjectIdentifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        let tlvs = self
            .elements
            .iter()
            .map(|e| e.encode())
            .collect::<Result<Vec<Tlv>, _>>()?;
        Ok(Der::new(tlvs))
    }
}

impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    /// Parses the DER carried inside an OCTET STRING (extension values,
    /// PKCS#12 bags).
    fn try_from(value: &OctetString) -> Result<Self, Self::Error> {
        let der: Der = value.as_bytes().decode()?;
        der.decode()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    PrintableString(String),
    T61String(String),
    IA5String(String),
    BMPString(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    /// `[slot]` constructed: an EXPLICIT wrapper holds one element, an
    /// IMPLICIT SEQUENCE/SET OF holds zero or more.
    ContextSpecific {
        slot: u8,
        elements: Vec<Element>,
    },
    /// `[slot]` primitive: IMPLICIT tagging of a primitive type, contents kept as is.
    Implicit {
        slot: u8,
        data: Vec<u8>,
    },
    Raw(Tlv),
}

impl Element {
    /// `[slot] EXPLICIT element`
    pub fn explicit(slot: u8, element: Element) -> Self {
        Element::ContextSpecific {
            slot,
            elements: vec![element],
        }
    }

    /// UTCTime for years 1950 through 2049, GeneralizedTime otherwise
    /// (RFC 5280 4.1.2.5).
    pub fn time(time: NaiveDateTime) -> Self {
        if (1950..2050).contains(&time.year()) {
            Element::UTCTime(time)
        } else {
            Element::GeneralizedTime(time)
        }
    }

    /// Decodes exactly one DER element.
    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let tlv = Tlv::from_der(bytes)?;
        Element::try_from(&tlv)
    }

    pub fn to_der(&self) -> Result<Vec<u8>, Error> {
        Ok(self.encode()?.to_der())
    }

    pub fn as_sequence(&self) -> Option<&[Element]> {
        match self {
            Element::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveDateTime> {
        match self {
            Element::UTCTime(t) | Element::GeneralizedTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Text of any of the string types.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::UTF8String(s)
            | Element::PrintableString(s)
            | Element::T61String(s)
            | Element::IA5String(s)
            | Element::BMPString(s) => Some(s),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::PrintableString(_) => "PrintableString",
            Element::T61String(_) => "T61String",
            Element::IA5String(_) => "IA5String",
            Element::BMPString(_) => "BMPString",
            Element::UTCTime(_) => "UTCTime",
            Element::GeneralizedTime(_) => "GeneralizedTime",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::ContextSpecific { .. } => "context-specific (constructed)",
            Element::Implicit { .. } => "context-specific (primitive)",
            Element::Raw(_) => "raw",
        }
    }
}

fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
}

fn children(tlv: &Tlv) -> Result<Vec<Element>, Error> {
    tlv.tlvs()
        .unwrap_or_default()
        .iter()
        .map(Element::try_from)
        .collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        let tag = tlv.tag();
        if tag.class() == TagClass::ContextSpecific {
            let Ok(slot) = u8::try_from(tag.number()) else {
                return Ok(Element::Raw(tlv.clone()));
            };
            return match tlv.value() {
                Value::Constructed(_) => Ok(Element::ContextSpecific {
                    slot,
                    elements: children(tlv)?,
                }),
                Value::Primitive(data) => Ok(Element::Implicit {
                    slot,
                    data: data.clone(),
                }),
            };
        }
        if tag.class() != TagClass::Universal {
            return Ok(Element::Raw(tlv.clone()));
        }

        match (tag.number(), tlv.value()) {
            (16, Value::Constructed(_)) => Ok(Element::Sequence(children(tlv)?)),
            (17, Value::Constructed(_)) => Ok(Element::Set(children(tlv)?)),
            (_, Value::Constructed(_)) => Ok(Element::Raw(tlv.clone())),
            (1, Value::Primitive(data)) => match data.as_slice() {
                [0x00] => Ok(Element::Boolean(false)),
                [0xff] => Ok(Element::Boolean(true)),
                _ => Err(Error::InvalidBoolean),
            },
            (2, Value::Primitive(data)) => {
                if data.is_empty() {
                    return Err(Error::IntegerNoData);
                }
                Ok(Element::Integer(Integer::from(data.as_slice())))
            }
            (3, Value::Primitive(data)) => {
                Ok(Element::BitString(BitString::try_from(data.as_slice())?))
            }
            (4, Value::Primitive(data)) => Ok(Element::OctetString(OctetString::from(data.clone()))),
            (5, Value::Primitive(data)) => {
                if !data.is_empty() {
                    return Err(Error::InvalidNull);
                }
                Ok(Element::Null)
            }
            (6, Value::Primitive(data)) => Ok(Element::ObjectIdentifier(
                ObjectIdentifier::try_from(data.as_slice())?,
            )),
            (12, Value::Primitive(data)) => String::from_utf8(data.clone())
                .map(Element::UTF8String)
                .map_err(|_| Error::Utf8StringInvalidUtf8),
            (19, Value::Primitive(data)) => {
                let s = String::from_utf8(data.clone())
                    .map_err(|_| Error::PrintableStringInvalidCharacter)?;
                // '*' and '&' show up in deployed certificates; accept on input.
                if !s.chars().all(|c| is_printable(c) || c == '*' || c == '&') {
                    return Err(Error::PrintableStringInvalidCharacter);
                }
                Ok(Element::PrintableString(s))
            }
            // T61 is decoded as Latin-1, which covers what is seen in practice.
            (20, Value::Primitive(data)) => Ok(Element::T61String(
                data.iter().map(|&b| b as char).collect(),
            )),
            (22, Value::Primitive(data)) => {
                if !data.is_ascii() {
                    return Err(Error::Ia5StringInvalidCharacter);
                }
                String::from_utf8(data.clone())
                    .map(Element::IA5String)
                    .map_err(|_| Error::Ia5StringInvalidCharacter)
            }
            (23, Value::Primitive(data)) => Ok(Element::UTCTime(time::parse_utc_time(data)?)),
            (24, Value::Primitive(data)) => Ok(Element::GeneralizedTime(
                time::parse_generalized_time(data)?,
            )),
            (30, Value::Primitive(data)) => {
                if data.len() % 2 != 0 {
                    return Err(Error::BmpStringOddLength(data.len()));
                }
                let units = data
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect::<Vec<u16>>();
                String::from_utf16(&units)
                    .map(Element::BMPString)
                    .map_err(|_| Error::BmpStringInvalidUtf16)
            }
            _ => Ok(Element::Raw(tlv.clone())),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        let encode_all = |elements: &[Element]| {
            elements
                .iter()
                .map(|e| e.encode())
                .collect::<Result<Vec<Tlv>, Error>>()
        };
        let tlv = match self {
            Element::Boolean(b) => Tlv::primitive(Tag::BOOLEAN, vec![if *b { 0xff } else { 0x00 }]),
            Element::Integer(i) => Tlv::primitive(Tag::INTEGER, i.to_der_bytes()),
            Element::BitString(bs) => {
                let mut data = Vec::with_capacity(bs.data.len() + 1);
                data.push(bs.unused);
                data.extend_from_slice(&bs.data);
                Tlv::primitive(Tag::BIT_STRING, data)
            }
            Element::OctetString(os) => Tlv::primitive(Tag::OCTET_STRING, os.inner.clone()),
            Element::Null => Tlv::primitive(Tag::NULL, vec![]),
            Element::ObjectIdentifier(oid) => {
                Tlv::primitive(Tag::OBJECT_IDENTIFIER, oid.to_der_bytes()?)
            }
            Element::UTF8String(s) => Tlv::primitive(Tag::UTF8_STRING, s.as_bytes().to_vec()),
            Element::PrintableString(s) => {
                if !s.chars().all(is_printable) {
                    return Err(Error::PrintableStringInvalidCharacter);
                }
                Tlv::primitive(Tag::PRINTABLE_STRING, s.as_bytes().to_vec())
            }
            Element::T61String(s) => {
                let bytes = s
                    .chars()
                    .map(|c| u8::try_from(c as u32).map_err(|_| Error::T61StringInvalidCharacter))
                    .collect::<Result<Vec<u8>, _>>()?;
                Tlv::primitive(Tag::T61_STRING, bytes)
            }
            Element::IA5String(s) => {
                if !s.is_ascii() {
                    return Err(Error::Ia5StringInvalidCharacter);
                }
                Tlv::primitive(Tag::IA5_STRING, s.as_bytes().to_vec())
            }
            Element::BMPString(s) => Tlv::primitive(
                Tag::BMP_STRING,
                s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
            ),
            Element::UTCTime(t) => {
                Tlv::primitive(Tag::UTC_TIME, time::format_utc_time(t).into_bytes())
            }
            Element::GeneralizedTime(t) => Tlv::primitive(
                Tag::GENERALIZED_TIME,
                time::format_generalized_time(t).into_bytes(),
            ),
            Element::Sequence(elements) => Tlv::constructed(Tag::SEQUENCE, encode_all(elements)?),
            Element::Set(elements) => Tlv::constructed(Tag::SET, encode_all(elements)?),
            Element::ContextSpecific { slot, elements } => {
                Tlv::constructed(Tag::context(*slot as u32, true), encode_all(elements)?)
            }
            Element::Implicit { slot, data } => {
                Tlv::primitive(Tag::context(*slot as u32, false), data.clone())
            }
            Element::Raw(tlv) => tlv.clone(),
        };
        Ok(tlv)
    }
}

/// INTEGER of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Non-negative integer from big-endian magnitude bytes.
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_bytes_be(Sign::Plus, bytes),
        }
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    /// Magnitude as big-endian bytes without sign padding; `None` if negative.
    pub fn to_unsigned_bytes(&self) -> Option<Vec<u8>> {
        self.inner.to_biguint().map(|u| u.to_bytes_be())
    }

    pub fn to_biguint(&self) -> Option<BigUint> {
        self.inner.to_biguint()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Minimal two's complement contents octets.
    pub fn to_der_bytes(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }
}

impl From<&[u8]> for Integer {
    /// Two's complement contents octets.
    fn from(data: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(data),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<BigUint> for Integer {
    fn from(value: BigUint) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl std::fmt::Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self, Error> {
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString { unused, data })
    }

    /// Whole-octet bit string (signatures, public keys).
    pub fn from_bytes(data: Vec<u8>) -> Self {
        BitString { unused: 0, data }
    }

    /// Named-bit list in DER form: trailing zero bits removed.
    pub fn from_bits(bits: &[bool]) -> Self {
        let len = bits.iter().rposition(|b| *b).map_or(0, |p| p + 1);
        let mut data = vec![0u8; len.div_ceil(8)];
        for (i, _) in bits.iter().enumerate().take(len).filter(|(_, b)| **b) {
            if let Some(byte) = data.get_mut(i / 8) {
                *byte |= 0x80 >> (i % 8);
            }
        }
        let unused = (data.len() * 8 - len) as u8;
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit(&self, index: usize) -> bool {
        self.data
            .get(index / 8)
            .is_some_and(|b| b & (0x80 >> (index % 8)) != 0)
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        match data.split_first() {
            Some((unused, rest)) => BitString::new(*unused, rest.to_vec()),
            None => Err(Error::BitStringNoData),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(inner: Vec<u8>) -> Self {
        OctetString { inner }
    }
}

impl From<&[u8]> for OctetString {
    fn from(data: &[u8]) -> Self {
        OctetString {
            inner: data.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rstest::rstest;
    use sslkit::decoder::Decoder;
    use sslkit::encoder::Encoder;
    use sslkit_der::Der;

    use super::*;

    const TEST_PEM_CERT: &str = r"-----BEGIN CERTIFICATE-----
MIICLDCCAdKgAwIBAgIBADAKBggqhkjOPQQDAjB9MQswCQYDVQQGEwJCRTEPMA0G
A1UEChMGR251VExTMSUwIwYDVQQLExxHbnVUTFMgY2VydGlmaWNhdGUgYXV0aG9y
aXR5MQ8wDQYDVQQIEwZMZXV2ZW4xJTAjBgNVBAMTHEdudVRMUyBjZXJ0aWZpY2F0
ZSBhdXRob3JpdHkwHhcNMTEwNTIzMjAzODIxWhcNMTIxMjIyMDc0MTUxWjB9MQsw
CQYDVQQGEwJCRTEPMA0GA1UEChMGR251VExTMSUwIwYDVQQLExxHbnVUTFMgY2Vy
dGlmaWNhdGUgYXV0aG9yaXR5MQ8wDQYDVQQIEwZMZXV2ZW4xJTAjBgNVBAMTHEdu
dVRMUyBjZXJ0aWZpY2F0ZSBhdXRob3JpdHkwWTATBgcqhkjOPQIBBggqhkjOPQMB
BwNCAARS2I0jiuNn14Y2sSALCX3IybqiIJUvxUpj+oNfzngvj/Niyv2394BWnW4X
uQ4RTEiywK87WRcWMGgJB5kX/t2no0MwQTAPBgNVHRMBAf8EBTADAQH/MA8GA1Ud
DwEB/wQFAwMHBgAwHQYDVR0OBBYEFPC0gf6YEr+1KLlkQAPLzB9mTigDMAoGCCqG
SM49BAMCA0gAMEUCIDGuwD1KPyG+hRf88MeyMQcqOFZD0TbVleF+UsAGQ4enAiEA
l4wOuDwKQa+upc8GftXE2C//4mKANBC6It01gUaTIpo=
-----END CERTIFICATE-----";

    #[rstest(input, expected,
        case(vec![0x01, 0x01, 0xff], Element::Boolean(true)),
        case(vec![0x02, 0x01, 0x7f], Element::Integer(Integer::from(127i64))),
        case(vec![0x02, 0x02, 0x00, 0x80], Element::Integer(Integer::from(128i64))),
        case(vec![0x02, 0x01, 0x80], Element::Integer(Integer::from(-128i64))),
        case(vec![0x05, 0x00], Element::Null),
        case(vec![0x03, 0x02, 0x07, 0x80], Element::BitString(BitString::new(7, vec![0x80]).unwrap())),
        case(vec![0x04, 0x02, 0x01, 0x02], Element::OctetString(OctetString::from(vec![0x01, 0x02]))),
        case(vec![0x06, 0x03, 0x55, 0x04, 0x03], Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.4.3").unwrap())),
        case(vec![0x0c, 0x04, 0xf0, 0x9f, 0x98, 0x8e], Element::UTF8String("\u{1F60E}".to_string())),
        case(vec![0x13, 0x02, 0x55, 0x53], Element::PrintableString("US".to_string())),
        case(vec![0x14, 0x02, 0x63, 0xe9], Element::T61String("c\u{e9}".to_string())),
        case(vec![0x16, 0x03, 0x61, 0x40, 0x62], Element::IA5String("a@b".to_string())),
        case(vec![0x1e, 0x04, 0x00, 0x68, 0x00, 0x69], Element::BMPString("hi".to_string())),
        case(vec![0x17, 0x0d, 0x31, 0x31, 0x30, 0x35, 0x32, 0x33, 0x32, 0x30, 0x33, 0x38, 0x32, 0x31, 0x5a],
            Element::UTCTime(NaiveDate::from_ymd_opt(2011, 5, 23).unwrap().and_hms_opt(20, 38, 21).unwrap())),
        case(vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x01, 0x01, 0x00],
            Element::Sequence(vec![Element::Integer(Integer::from(1i64)), Element::Boolean(false)])),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x02], Element::explicit(0, Element::Integer(Integer::from(2i64)))),
        case(vec![0x82, 0x03, 0x61, 0x2e, 0x62], Element::Implicit { slot: 2, data: b"a.b".to_vec() }),
        case(vec![0x42, 0x01, 0x00], Element::Raw(Tlv::primitive(Tag::new(TagClass::Application, false, 2), vec![0x00]))),
    )]
    fn test_element_round_trip(input: Vec<u8>, expected: Element) {
        let actual = Element::from_der(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, actual.to_der().unwrap());
    }

    #[rstest]
    #[case::bad_boolean(vec![0x01, 0x01, 0x01])]
    #[case::empty_integer(vec![0x02, 0x00])]
    #[case::null_with_data(vec![0x05, 0x01, 0x00])]
    #[case::unused_bits(vec![0x03, 0x02, 0x08, 0x00])]
    #[case::printable(vec![0x13, 0x01, 0x40])]
    #[case::ia5(vec![0x16, 0x01, 0xe9])]
    #[case::bmp_odd(vec![0x1e, 0x01, 0x00])]
    #[case::utf8(vec![0x0c, 0x01, 0xff])]
    fn test_element_decode_error(#[case] input: Vec<u8>) {
        assert!(Element::from_der(&input).is_err());
    }

    #[rstest]
    #[case(vec![true, false, true], 5, vec![0xa0])]
    #[case(vec![true, false, false, false, false, false, false, false, true], 7, vec![0x80, 0x80])]
    #[case(vec![false, false], 0, vec![])]
    fn test_bit_string_from_bits(
        #[case] bits: Vec<bool>,
        #[case] unused: u8,
        #[case] data: Vec<u8>,
    ) {
        let bs = BitString::from_bits(&bits);
        assert_eq!(unused, bs.unused_bits());
        assert_eq!(data, bs.as_bytes());
        for (i, b) in bits.iter().enumerate() {
            assert_eq!(*b, bs.bit(i));
        }
    }

    #[rstest]
    #[case(2049, true)]
    #[case(1950, true)]
    #[case(2050, false)]
    #[case(1949, false)]
    fn test_element_time(#[case] year: i32, #[case] utc: bool) {
        let t = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(utc, matches!(Element::time(t), Element::UTCTime(_)));
    }

    #[test]
    fn test_certificate_round_trip() {
        let pem: sslkit_pem::Pem = TEST_PEM_CERT.parse().unwrap();
        let der: Der = pem.body().decode().unwrap();
        let asn1: ASN1Object = der.decode().unwrap();
        let [Element::Sequence(certificate)] = asn1.elements() else {
            panic!("expected a single SEQUENCE");
        };
        assert_eq!(3, certificate.len());

        let der: Der = asn1.encode().unwrap();
        let bytes: Vec<u8> = der.encode().unwrap();
        assert_eq!(pem.body(), bytes.as_slice());
    }
}
