use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::Error;

/// OBJECT IDENTIFIER as its arc values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn new(components: Vec<u64>) -> Result<Self, Error> {
        match components.as_slice() {
            [first, second, ..] if *first <= 2 && (*first == 2 || *second < 40) => {
                Ok(ObjectIdentifier { inner: components })
            }
            [_, _, ..] => Err(Error::ObjectIdentifierInvalidComponent(
                components
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join("."),
            )),
            _ => Err(Error::ObjectIdentifierTooFewComponents),
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.inner
    }

    /// Contents octets in base-128.
    pub fn to_der_bytes(&self) -> Result<Vec<u8>, Error> {
        let (first, rest) = match self.inner.as_slice() {
            [a, b, rest @ ..] => {
                let first = a
                    .checked_mul(40)
                    .and_then(|v| v.checked_add(*b))
                    .ok_or(Error::ObjectIdentifierOverflow)?;
                (first, rest)
            }
            _ => return Err(Error::ObjectIdentifierTooFewComponents),
        };
        let mut out = Vec::new();
        for arc in std::iter::once(&first).chain(rest.iter()) {
            write_base128(*arc, &mut out);
        }
        Ok(out)
    }
}

fn write_base128(value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut v = value >> 7;
    while v > 0 {
        groups.push((v & 0x7f) as u8 | 0x80);
        v >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }
        let mut arcs = Vec::new();
        let mut value: u64 = 0;
        let mut in_progress = false;
        for &b in data {
            if !in_progress && b == 0x80 {
                // leading 0x80 is a non-minimal encoding
                return Err(Error::ObjectIdentifierIncompleteEncoding);
            }
            if value > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierOverflow);
            }
            value = (value << 7) | (b & 0x7f) as u64;
            if b & 0x80 == 0 {
                arcs.push(value);
                value = 0;
                in_progress = false;
            } else {
                in_progress = true;
            }
        }
        if in_progress {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }
        let mut inner = Vec::with_capacity(arcs.len() + 1);
        let mut arcs = arcs.into_iter();
        match arcs.next() {
            Some(first) if first < 40 => inner.extend([0, first]),
            Some(first) if first < 80 => inner.extend([1, first - 40]),
            Some(first) => inner.extend([2, first - 80]),
            None => return Err(Error::ObjectIdentifierNoData),
        }
        inner.extend(arcs);
        Ok(ObjectIdentifier { inner })
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        ObjectIdentifier::new(components)
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], "1.2.840.113549.1.1.11"),
        case(vec![0x55, 0x04, 0x03], "2.5.4.3"),
        case(vec![0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07], "1.2.840.10045.3.1.7"),
        case(vec![0x2b, 0x81, 0x04, 0x00, 0x23], "1.3.132.0.35"),
        case(vec![0x88, 0x37, 0x03], "2.999.3"),
        case(vec![0x00], "0.0"),
    )]
    fn test_oid_round_trip(input: Vec<u8>, expected: &str) {
        let oid = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, oid.to_string());
        let parsed: ObjectIdentifier = expected.parse().unwrap();
        assert_eq!(input, parsed.to_der_bytes().unwrap());
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::dangling(vec![0x2a, 0x86])]
    #[case::non_minimal(vec![0x2a, 0x80, 0x01])]
    fn test_oid_decode_error(#[case] input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest]
    #[case("1")]
    #[case("3.1")]
    #[case("1.40")]
    #[case("1.2.x")]
    fn test_oid_from_str_error(#[case] input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[test]
    fn test_oid_serde() {
        let oid: ObjectIdentifier = "2.5.29.19".parse().unwrap();
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!("\"2.5.29.19\"", json);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);
    }
}
