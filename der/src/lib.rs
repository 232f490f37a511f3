//! DER tag-length-value codec.
//!
//! Decoding is strict: indefinite lengths, non-minimal lengths, non-minimal
//! high tag numbers and truncated fields are rejected, so that re-encoding a
//! decoded tree reproduces the input byte for byte.
//!
//! ```
//! use sslkit::decoder::Decoder;
//! use sslkit::encoder::Encoder;
//! use sslkit_der::Der;
//!
//! let bytes = vec![0x30, 0x03, 0x02, 0x01, 0x07];
//! let der: Der = bytes.decode().unwrap();
//! let encoded: Vec<u8> = der.encode().unwrap();
//! assert_eq!(bytes, encoded);
//! ```

use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};

pub mod error;
mod tag;

pub use error::Error;
pub use tag::{Tag, TagClass};
use tag::{CONSTRUCTED_BIT, HIGH_TAG_NUMBER};

/// Deepest nesting of constructed values accepted by the decoder.
pub const MAX_DEPTH: usize = 64;

/// Sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tlv> {
        self.elements
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Primitive(Vec<u8>),
    Constructed(Vec<Tlv>),
}

impl Tlv {
    /// Primitive TLV. The constructed bit of `tag` is cleared.
    pub fn primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag: tag.with_constructed(false),
            value: Value::Primitive(data),
        }
    }

    /// Constructed TLV. The constructed bit of `tag` is set.
    pub fn constructed(tag: Tag, children: Vec<Tlv>) -> Self {
        Tlv {
            tag: tag.with_constructed(true),
            value: Value::Constructed(children),
        }
    }

    /// Decodes exactly one TLV; trailing bytes are an error.
    pub fn from_der(input: &[u8]) -> Result<Tlv, Error> {
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let (rest, tlv) = parse_tlv(input, 0)?;
        if !rest.is_empty() {
            return Err(Error::TrailingData(rest.len()));
        }
        Ok(tlv)
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Primitive(data) => Some(data),
            Value::Constructed(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Primitive(_) => None,
            Value::Constructed(tlvs) => Some(tlvs),
        }
    }

    pub fn to_der(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        self.tag.write(out);
        match &self.value {
            Value::Primitive(data) => {
                write_length(data.len(), out);
                out.extend_from_slice(data);
            }
            Value::Constructed(children) => {
                let mut content = Vec::new();
                for child in children {
                    child.write(&mut content);
                }
                write_length(content.len(), out);
                out.extend_from_slice(&content);
            }
        }
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let mut elements = Vec::new();
        let mut input: &[u8] = self;
        while !input.is_empty() {
            let (rest, tlv) = parse_tlv(input, 0)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write(&mut out);
        }
        Ok(out)
    }
}

/// Reads the header of the first TLV in `input`.
///
/// Returns the tag, the contents octets and the bytes after the TLV. The
/// contents are not parsed, which keeps signed regions byte-exact.
pub fn read_header(input: &[u8]) -> Result<(Tag, &[u8], &[u8]), Error> {
    if input.is_empty() {
        return Err(Error::Empty);
    }
    let (input, tag) = parse_tag(input)?;
    let (input, length) = parse_length(input)?;
    let (rest, contents) = take_bytes(input, length)?;
    Ok((tag, contents, rest))
}

/// Splits `input` into the raw encodings of its consecutive TLVs.
pub fn split(input: &[u8]) -> Result<Vec<&[u8]>, Error> {
    let mut raws = Vec::new();
    let mut input = input;
    while !input.is_empty() {
        let (_, _, rest) = read_header(input)?;
        let (raw, _) = input.split_at(input.len() - rest.len());
        raws.push(raw);
        input = rest;
    }
    Ok(raws)
}

fn take_bytes(input: &[u8], length: usize) -> Result<(&[u8], &[u8]), Error> {
    let taken: IResult<&[u8], &[u8], Error> = nom::bytes::complete::take(length).parse(input);
    let (rest, data) = taken?;
    Ok((rest, data))
}

fn parse_tlv(input: &[u8], depth: usize) -> IResult<&[u8], Tlv, Error> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::TooDeep(MAX_DEPTH)));
    }
    let (input, tag) = parse_tag(input)?;
    let (input, length) = parse_length(input)?;
    let (input, data) = nom::bytes::complete::take(length).parse(input)?;

    if tag.is_constructed() {
        let mut children = Vec::new();
        let mut data: &[u8] = data;
        while !data.is_empty() {
            let (rest, child) = parse_tlv(data, depth + 1)?;
            data = rest;
            children.push(child);
        }
        return Ok((
            input,
            Tlv {
                tag,
                value: Value::Constructed(children),
            },
        ));
    }

    Ok((
        input,
        Tlv {
            tag,
            value: Value::Primitive(data.to_vec()),
        },
    ))
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag, Error> {
    let (mut input, first) = nom::number::complete::be_u8(input)?;
    let class = TagClass::from_bits(first);
    let constructed = first & CONSTRUCTED_BIT != 0;
    let low = first & HIGH_TAG_NUMBER;
    if low != HIGH_TAG_NUMBER {
        return Ok((input, Tag::new(class, constructed, low as u32)));
    }

    // high-tag-number form: base-128, most significant group first.
    let mut number: u32 = 0;
    let mut leading = true;
    loop {
        let (rest, b) = nom::number::complete::be_u8(input)?;
        input = rest;
        if leading && b == 0x80 {
            return Err(nom::Err::Failure(Error::NonMinimalTag));
        }
        leading = false;
        if number > (u32::MAX >> 7) {
            return Err(nom::Err::Failure(Error::TagOverflow));
        }
        number = (number << 7) | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            break;
        }
    }
    if number < HIGH_TAG_NUMBER as u32 {
        return Err(nom::Err::Failure(Error::NonMinimalTag));
    }
    Ok((input, Tag::new(class, constructed, number)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize, Error> {
    let (input, n) = nom::number::complete::be_u8(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((input, n as usize));
    }
    // long form: the low 7 bits count the length octets that follow.
    let count = (n & 0x7f) as usize;
    if count == 0 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if count > 8 {
        return Err(nom::Err::Failure(Error::LengthOverflow(count)));
    }
    let (input, bs) = nom::bytes::complete::take(count).parse(input)?;
    if bs.first() == Some(&0) {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    let length = bs.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
    if length < 0x80 {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    let length =
        usize::try_from(length).map_err(|_| nom::Err::Failure(Error::LengthOverflow(count)))?;
    Ok((input, length))
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = (length as u64).to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    let digits = bytes.get(start..).unwrap_or(&bytes);
    out.push(0x80 | digits.len() as u8);
    out.extend_from_slice(digits);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sslkit::decoder::Decoder;
    use sslkit::encoder::Encoder;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x02], Tag::INTEGER),
        case(vec![0x30, 0x01], Tag::SEQUENCE),
        case(vec![0x31], Tag::SET),
        case(vec![0xa0], Tag::context(0, true)),
        case(vec![0x80], Tag::context(0, false)),
        case(vec![0x63], Tag::new(TagClass::Application, true, 3)),
        case(vec![0x1f, 0x1f], Tag::universal(31, false)),
        case(vec![0xbf, 0x81, 0x00], Tag::context(128, true)),
    )]
    fn test_parse_tag(input: Vec<u8>, expected: Tag) {
        let (_, actual) = parse_tag(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x1f, 0x80, 0x01], Error::NonMinimalTag),
        case(vec![0x1f, 0x1e], Error::NonMinimalTag),
        case(vec![0x1f, 0xff, 0xff, 0xff, 0xff, 0x7f], Error::TagOverflow),
        case(vec![0x1f, 0x81], Error::Truncated),
    )]
    fn test_parse_tag_error(input: Vec<u8>, expected: Error) {
        let err: Error = parse_tag(&input).unwrap_err().into();
        assert_eq!(expected, err);
    }

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: usize) {
        let (_, actual) = parse_length(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x80], Error::IndefiniteLength),
        case(vec![0x89, 1, 1, 1, 1, 1, 1, 1, 1, 1], Error::LengthOverflow(9)),
        case(vec![0x81, 0x05], Error::NonMinimalLength),
        case(vec![0x82, 0x00, 0x90], Error::NonMinimalLength),
        case(vec![0x82, 0x01], Error::Truncated),
        case(vec![], Error::Truncated),
    )]
    fn test_parse_length_error(input: Vec<u8>, expected: Error) {
        let err: Error = parse_length(&input).unwrap_err().into();
        assert_eq!(expected, err);
    }

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x01], Tlv::primitive(Tag::INTEGER, vec![0x01])),
        case(vec![0x05, 0x00], Tlv::primitive(Tag::NULL, vec![])),
        case(vec![0x13, 0x02, 0x68, 0x69], Tlv::primitive(Tag::PRINTABLE_STRING, vec![0x68, 0x69])),
        case(vec![0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b],
            Tlv::primitive(Tag::OBJECT_IDENTIFIER, vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b])),
        case(vec![0x30, 0x09, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08, 0x02, 0x01, 0x09],
            Tlv::constructed(Tag::SEQUENCE, vec![
                Tlv::primitive(Tag::INTEGER, vec![0x07]),
                Tlv::primitive(Tag::INTEGER, vec![0x08]),
                Tlv::primitive(Tag::INTEGER, vec![0x09]),
            ])),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x02],
            Tlv::constructed(Tag::context(0, true), vec![Tlv::primitive(Tag::INTEGER, vec![0x02])])),
        case(vec![0x30, 0x00], Tlv::constructed(Tag::SEQUENCE, vec![])),
    )]
    fn test_tlv_from_der(input: Vec<u8>, expected: Tlv) {
        let actual = Tlv::from_der(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, actual.to_der());
    }

    #[rstest(input, expected,
        case(vec![], Error::Empty),
        case(vec![0x30, 0x05, 0x02, 0x01], Error::Truncated),
        case(vec![0x30, 0x80, 0x02, 0x01, 0x01, 0x00, 0x00], Error::IndefiniteLength),
        case(vec![0x30, 0x03, 0x02, 0x02, 0x01], Error::Truncated),
        case(vec![0x02, 0x01, 0x01, 0x00], Error::TrailingData(1)),
    )]
    fn test_tlv_from_der_error(input: Vec<u8>, expected: Error) {
        assert_eq!(expected, Tlv::from_der(&input).unwrap_err());
    }

    fn sample_trees() -> Vec<Tlv> {
        let long_data = (0..300u16).map(|i| (i % 251) as u8).collect::<Vec<u8>>();
        vec![
            Tlv::primitive(Tag::BOOLEAN, vec![0xff]),
            Tlv::primitive(Tag::OCTET_STRING, long_data.clone()),
            Tlv::constructed(
                Tag::SEQUENCE,
                vec![
                    Tlv::primitive(Tag::INTEGER, vec![0x00, 0x80]),
                    Tlv::constructed(
                        Tag::SET,
                        vec![Tlv::constructed(
                            Tag::SEQUENCE,
                            vec![
                                Tlv::primitive(Tag::OBJECT_IDENTIFIER, vec![0x55, 0x04, 0x03]),
                                Tlv::primitive(Tag::UTF8_STRING, b"example.com".to_vec()),
                            ],
                        )],
                    ),
                    Tlv::primitive(Tag::context(2, false), b"host".to_vec()),
                    Tlv::constructed(Tag::context(3, true), vec![]),
                ],
            ),
            Tlv::primitive(Tag::new(TagClass::Private, false, 1000), vec![1, 2, 3]),
            Tlv::constructed(
                Tag::new(TagClass::Application, true, 31),
                vec![Tlv::primitive(Tag::OCTET_STRING, long_data)],
            ),
        ]
    }

    #[test]
    fn test_der_round_trip() {
        let der = Der::new(sample_trees());
        let bytes: Vec<u8> = der.encode().unwrap();
        let decoded: Der = bytes.decode().unwrap();
        assert_eq!(der, decoded);
        let reencoded: Vec<u8> = decoded.encode().unwrap();
        assert_eq!(bytes, reencoded);
    }

    #[test]
    fn test_nesting_limit() {
        let mut tlv = Tlv::primitive(Tag::NULL, vec![]);
        for _ in 0..=MAX_DEPTH {
            tlv = Tlv::constructed(Tag::SEQUENCE, vec![tlv]);
        }
        assert_eq!(Err(Error::TooDeep(MAX_DEPTH)), Tlv::from_der(&tlv.to_der()));
    }

    #[rstest(length, expected,
        case(0, vec![0x00]),
        case(127, vec![0x7f]),
        case(128, vec![0x81, 0x80]),
        case(256, vec![0x82, 0x01, 0x00]),
        case(65536, vec![0x83, 0x01, 0x00, 0x00]),
    )]
    fn test_write_length(length: usize, expected: Vec<u8>) {
        let mut out = Vec::new();
        write_length(length, &mut out);
        assert_eq!(expected, out);
    }

    #[test]
    fn test_split_and_read_header() {
        let input = vec![0x30, 0x08, 0x02, 0x01, 0x07, 0x05, 0x00, 0x01, 0x01, 0xff];
        let (tag, contents, rest) = read_header(&input).unwrap();
        assert_eq!(Tag::SEQUENCE, tag);
        assert!(rest.is_empty());
        let raws = split(contents).unwrap();
        assert_eq!(
            vec![&[0x02, 0x01, 0x07][..], &[0x05, 0x00][..], &[0x01, 0x01, 0xff][..]],
            raws
        );
    }
}
