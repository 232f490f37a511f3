//! SEC1 (RFC 5915) ECPrivateKey structure

use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{BitString, Element, Integer, ObjectIdentifier, OctetString};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkix_types::NamedCurve;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{Error, Result};

/*
RFC 5915 - Elliptic Curve Private Key Structure

ECPrivateKey ::= SEQUENCE {
    version        INTEGER { ecPrivkeyVer1(1) } (ecPrivkeyVer1),
    privateKey     OCTET STRING,
    parameters [0] ECParameters {{ NamedCurve }} OPTIONAL,
    publicKey  [1] BIT STRING OPTIONAL
}
*/

/// SEC1 EC Private Key structure (RFC 5915)
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ECPrivateKey {
    /// Big-endian private scalar
    private_key: Vec<u8>,
    /// [0], omitted when the key sits inside PKCS#8 (RFC 5915 Section 3)
    #[zeroize(skip)]
    pub parameters: Option<NamedCurve>,
    /// [1] uncompressed point
    #[zeroize(skip)]
    pub public_key: Option<BitString>,
}

impl std::fmt::Debug for ECPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ECPrivateKey")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl ECPrivateKey {
    pub fn new(
        private_key: Vec<u8>,
        parameters: Option<NamedCurve>,
        public_key: Option<BitString>,
    ) -> Self {
        Self {
            private_key,
            parameters,
            public_key,
        }
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn key_size(&self) -> usize {
        self.parameters
            .map_or(self.private_key.len() * 8, |curve| curve.bits())
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element = self.encode()?;
        Ok(element.to_der()?)
    }
}

impl DecodableFrom<Element> for ECPrivateKey {}

impl Decoder<Element, ECPrivateKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ECPrivateKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::ExpectedSequence);
        };
        let mut iter = elements.iter();

        match iter.next() {
            Some(Element::Integer(v)) => match v.to_i64() {
                Some(1) => {}
                other => return Err(Error::InvalidVersion(other.unwrap_or(-1))),
            },
            Some(_) => return Err(Error::InsufficientElements("version")),
            None => return Err(Error::InsufficientElements("version")),
        }

        let private_key = match iter.next() {
            Some(Element::OctetString(octets)) => octets.as_bytes().to_vec(),
            Some(_) => return Err(Error::ExpectedOctetString),
            None => return Err(Error::InsufficientElements("privateKey")),
        };

        let mut parameters = None;
        let mut public_key = None;
        for element in iter {
            match element {
                Element::ContextSpecific { slot: 0, elements } => match elements.as_slice() {
                    [Element::ObjectIdentifier(oid)] => {
                        parameters = Some(NamedCurve::from_oid(oid)?);
                    }
                    _ => return Err(Error::InvalidParameters("expected namedCurve")),
                },
                Element::ContextSpecific { slot: 1, elements } => match elements.as_slice() {
                    [Element::BitString(bits)] => public_key = Some(bits.clone()),
                    _ => return Err(Error::InvalidParameters("expected BIT STRING publicKey")),
                },
                _ => return Err(Error::InvalidParameters("unexpected element")),
            }
        }

        Ok(ECPrivateKey {
            private_key,
            parameters,
            public_key,
        })
    }
}

impl EncodableTo<ECPrivateKey> for Element {}

impl Encoder<ECPrivateKey, Element> for ECPrivateKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![
            Element::Integer(Integer::from(1u32)),
            Element::OctetString(OctetString::from(self.private_key.as_slice())),
        ];
        if let Some(curve) = self.parameters {
            let oid: ObjectIdentifier = curve.oid().parse()?;
            elements.push(Element::explicit(0, Element::ObjectIdentifier(oid)));
        }
        if let Some(public_key) = &self.public_key {
            elements.push(Element::explicit(1, Element::BitString(public_key.clone())));
        }
        Ok(Element::Sequence(elements))
    }
}

impl ToPem for ECPrivateKey {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::ECPrivateKey
    }

    fn to_pem(&self) -> Result<Pem> {
        let mut der = self.to_der()?;
        let pem = Pem::from_bytes(self.pem_label(), &der);
        der.zeroize();
        Ok(pem)
    }
}

impl FromPem for ECPrivateKey {
    type Error = Error;

    fn expected_label() -> Label {
        Label::ECPrivateKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        Self::from_der(pem.body())
    }
}
