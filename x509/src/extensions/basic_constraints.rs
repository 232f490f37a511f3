use std::fmt;

use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer, OctetString};

use super::error::{Error, Kind, Result};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

/// Basic Constraints extension ([RFC 5280 Section 4.2.1.9](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9)).
///
/// Identifies whether the subject of the certificate is a CA and the maximum
/// number of non-self-issued intermediates that may follow it in a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicConstraints {
    /// Whether this certificate represents a CA
    pub ca: bool,
    /// Optional maximum path length for certificate chains
    pub path_len_constraint: Option<u32>,
}

impl BasicConstraints {
    pub fn ca(path_len_constraint: Option<u32>) -> Self {
        Self {
            ca: true,
            path_len_constraint,
        }
    }

    pub fn end_entity() -> Self {
        Self::default()
    }
}

impl Extension for BasicConstraints {
    const OID: &'static str = "2.5.29.19";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for BasicConstraints {}

impl Decoder<Element, BasicConstraints> for Element {
    type Error = Error;

    fn decode(&self) -> Result<BasicConstraints> {
        match self {
            Element::Sequence(elements) => {
                let (ca, path_len_constraint) =
                    elements
                        .iter()
                        .try_fold((false, None), |(ca, path_len), elem| match elem {
                            Element::Boolean(b) => Ok((*b, path_len)),
                            Element::Integer(i) => {
                                let value =
                                    i.to_u32().ok_or(Error::PathLenConstraintOutOfRange)?;
                                Ok((ca, Some(value)))
                            }
                            _ => Err(Error::UnexpectedElementType(Kind::BasicConstraints)),
                        })?;

                Ok(BasicConstraints {
                    ca,
                    path_len_constraint,
                })
            }
            _ => Err(Error::ExpectedSequence(Kind::BasicConstraints)),
        }
    }
}

impl fmt::Display for BasicConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ca {
            write!(f, "CA:TRUE")?;
            if let Some(pathlen) = self.path_len_constraint {
                write!(f, ", pathlen:{}", pathlen)?;
            }
            Ok(())
        } else {
            write!(f, "CA:FALSE")
        }
    }
}

impl EncodableTo<BasicConstraints> for Element {}

impl Encoder<BasicConstraints, Element> for BasicConstraints {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        // DEFAULT FALSE is omitted in DER
        let ca = self.ca.then_some(Element::Boolean(true));
        let path_len = self
            .path_len_constraint
            .map(|len| Element::Integer(Integer::from(len)));

        Ok(Element::Sequence(ca.into_iter().chain(path_len).collect()))
    }
}
