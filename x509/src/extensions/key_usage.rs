use std::fmt;

use serde::{Deserialize, Serialize};
use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{BitString, Element, OctetString};

use super::error::{Error, Kind, Result};
use super::{Extension, element_value, value_element};

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1),
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8) }
*/

/// Key Usage extension ([RFC 5280 Section 4.2.1.3](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.3)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    fn bits(&self) -> [bool; 9] {
        [
            self.digital_signature,
            self.non_repudiation,
            self.key_encipherment,
            self.data_encipherment,
            self.key_agreement,
            self.key_cert_sign,
            self.crl_sign,
            self.encipher_only,
            self.decipher_only,
        ]
    }

    /// Names of the asserted bits in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        const NAMES: [&str; 9] = [
            "Digital Signature",
            "Non Repudiation",
            "Key Encipherment",
            "Data Encipherment",
            "Key Agreement",
            "Certificate Sign",
            "CRL Sign",
            "Encipher Only",
            "Decipher Only",
        ];
        self.bits()
            .iter()
            .zip(NAMES)
            .filter(|(set, _)| **set)
            .map(|(_, name)| name)
            .collect()
    }
}

impl Extension for KeyUsage {
    const OID: &'static str = "2.5.29.15";

    fn parse(value: &OctetString) -> Result<Self> {
        value_element(value)?.decode()
    }

    fn to_value(&self) -> Result<OctetString> {
        element_value(&self.encode()?)
    }
}

impl DecodableFrom<Element> for KeyUsage {}

impl Decoder<Element, KeyUsage> for Element {
    type Error = Error;

    fn decode(&self) -> Result<KeyUsage> {
        let Element::BitString(bits) = self else {
            return Err(Error::ExpectedBitString(Kind::KeyUsage));
        };
        Ok(KeyUsage {
            digital_signature: bits.bit(0),
            non_repudiation: bits.bit(1),
            key_encipherment: bits.bit(2),
            data_encipherment: bits.bit(3),
            key_agreement: bits.bit(4),
            key_cert_sign: bits.bit(5),
            crl_sign: bits.bit(6),
            encipher_only: bits.bit(7),
            decipher_only: bits.bit(8),
        })
    }
}

impl EncodableTo<KeyUsage> for Element {}

impl Encoder<KeyUsage, Element> for KeyUsage {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::BitString(BitString::from_bits(&self.bits())))
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(", "))
    }
}
