use sslkit::decoder::{DecodableFrom, Decoder};
use sslkit::encoder::{EncodableTo, Encoder};
use sslkit_asn1::{Element, Integer, ObjectIdentifier};
use sslkit_der::{Tag, Tlv};
use sslkit_pem::{FromPem, Label, Pem, ToPem};
use sslkit_pkix_types::AlgorithmIdentifier;
use tracing::debug;

use super::error::{Error, Result};

pub const OID_DATA: &str = "1.2.840.113549.1.7.1";
pub const OID_SIGNED_DATA: &str = "1.2.840.113549.1.7.2";
pub const OID_ENCRYPTED_DATA: &str = "1.2.840.113549.1.7.6";

/*
RFC 2315 Section 7

ContentInfo ::= SEQUENCE {
    contentType ContentType,
    content [0] EXPLICIT ANY DEFINED BY contentType OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    pub content_type: ObjectIdentifier,
    pub content: Option<Element>,
}

impl ContentInfo {
    pub fn new(content_type: &str, content: Option<Element>) -> Result<Self> {
        Ok(ContentInfo {
            content_type: content_type.parse()?,
            content,
        })
    }

    pub fn is(&self, content_type: &str) -> bool {
        self.content_type == content_type
    }
}

impl DecodableFrom<Element> for ContentInfo {}

impl Decoder<Element, ContentInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ContentInfo> {
        match self.as_sequence() {
            Some([Element::ObjectIdentifier(content_type)]) => Ok(ContentInfo {
                content_type: content_type.clone(),
                content: None,
            }),
            Some(
                [
                    Element::ObjectIdentifier(content_type),
                    Element::ContextSpecific { slot: 0, elements },
                ],
            ) => match elements.as_slice() {
                [content] => Ok(ContentInfo {
                    content_type: content_type.clone(),
                    content: Some(content.clone()),
                }),
                _ => Err(Error::InvalidStructure("content must hold one element")),
            },
            _ => Err(Error::InvalidStructure(
                "ContentInfo must be SEQUENCE { contentType, [0] content }",
            )),
        }
    }
}

impl EncodableTo<ContentInfo> for Element {}

impl Encoder<ContentInfo, Element> for ContentInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.content_type.clone())];
        if let Some(content) = &self.content {
            elements.push(Element::explicit(0, content.clone()));
        }
        Ok(Element::Sequence(elements))
    }
}

/*
RFC 2315 Section 9.1

SignedData ::= SEQUENCE {
    version Version,
    digestAlgorithms DigestAlgorithmIdentifiers,
    contentInfo ContentInfo,
    certificates [0] IMPLICIT ExtendedCertificatesAndCertificates OPTIONAL,
    crls [1] IMPLICIT CertificateRevocationLists OPTIONAL,
    signerInfos SignerInfos
}
*/

/// SignedData wrapped in its ContentInfo.
///
/// Certificates are kept as their exact DER so a PKCS#7 bundle can be
/// unpacked without re-encoding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    version: i64,
    digest_algorithms: Vec<AlgorithmIdentifier>,
    content_type: ObjectIdentifier,
    certificates: Vec<Vec<u8>>,
    crl_count: usize,
    signer_count: usize,
}

fn expect_tag<'a>(input: &'a [u8], tag: Tag, what: &'static str) -> Result<&'a [u8]> {
    let (got, contents, rest) = sslkit_der::read_header(input)?;
    if got != tag {
        return Err(Error::InvalidStructure(what));
    }
    if !rest.is_empty() {
        return Err(sslkit_der::Error::TrailingData(rest.len()).into());
    }
    Ok(contents)
}

impl SignedData {
    /// Certificates-only SignedData: version 1, no digest algorithms, empty
    /// `data` content and no signers.
    pub fn degenerate(certificates: Vec<Vec<u8>>) -> Result<Self> {
        Ok(SignedData {
            version: 1,
            digest_algorithms: Vec::new(),
            content_type: OID_DATA.parse()?,
            certificates,
            crl_count: 0,
            signer_count: 0,
        })
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn digest_algorithms(&self) -> &[AlgorithmIdentifier] {
        &self.digest_algorithms
    }

    /// Type of the encapsulated content.
    pub fn content_type(&self) -> &ObjectIdentifier {
        &self.content_type
    }

    pub fn certificates(&self) -> &[Vec<u8>] {
        &self.certificates
    }

    pub fn into_certificates(self) -> Vec<Vec<u8>> {
        self.certificates
    }

    pub fn crl_count(&self) -> usize {
        self.crl_count
    }

    pub fn signer_count(&self) -> usize {
        self.signer_count
    }

    pub fn is_degenerate(&self) -> bool {
        self.signer_count == 0 && self.crl_count == 0
    }

    /// Parses a ContentInfo holding SignedData.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let content_info = expect_tag(der, Tag::SEQUENCE, "ContentInfo must be a SEQUENCE")?;
        let parts = sslkit_der::split(content_info)?;
        let [content_type, content] = parts.as_slice() else {
            return Err(Error::InvalidStructure("ContentInfo without content"));
        };
        let Element::ObjectIdentifier(content_type) = Element::from_der(content_type)? else {
            return Err(Error::InvalidStructure("contentType must be an OBJECT IDENTIFIER"));
        };
        if content_type != OID_SIGNED_DATA {
            return Err(Error::UnsupportedContentType(content_type.to_string()));
        }
        let explicit = expect_tag(content, Tag::context(0, true), "content must be [0]")?;
        let signed_data = expect_tag(explicit, Tag::SEQUENCE, "SignedData must be a SEQUENCE")?;

        let fields = sslkit_der::split(signed_data)?;
        let mut fields = fields.into_iter();

        let version = match fields.next().map(Element::from_der).transpose()? {
            Some(Element::Integer(v)) => v.to_i64().unwrap_or(-1),
            _ => return Err(Error::InvalidStructure("missing version")),
        };
        if !(1..=5).contains(&version) {
            return Err(Error::UnsupportedVersion(version));
        }

        let digest_algorithms = match fields.next().map(Element::from_der).transpose()? {
            Some(Element::Set(algs)) => algs
                .iter()
                .map(|alg| alg.decode())
                .collect::<std::result::Result<Vec<AlgorithmIdentifier>, _>>()?,
            _ => return Err(Error::InvalidStructure("digestAlgorithms must be a SET")),
        };

        let encap_content_type = match fields
            .next()
            .map(Element::from_der)
            .transpose()?
            .as_ref()
            .and_then(|e| e.as_sequence())
        {
            Some([Element::ObjectIdentifier(oid), ..]) => oid.clone(),
            _ => return Err(Error::InvalidStructure("missing contentInfo")),
        };

        let mut certificates = Vec::new();
        let mut crl_count = 0;
        let mut signer_count = None;
        for field in fields {
            let (tag, contents, _) = sslkit_der::read_header(field)?;
            if tag == Tag::context(0, true) {
                certificates = sslkit_der::split(contents)?
                    .into_iter()
                    .map(<[u8]>::to_vec)
                    .collect();
            } else if tag == Tag::context(1, true) {
                crl_count = sslkit_der::split(contents)?.len();
            } else if tag == Tag::SET {
                signer_count = Some(sslkit_der::split(contents)?.len());
            } else {
                return Err(Error::InvalidStructure("unexpected SignedData field"));
            }
        }
        let signer_count =
            signer_count.ok_or(Error::InvalidStructure("missing signerInfos"))?;

        debug!(
            certificates = certificates.len(),
            signers = signer_count,
            "parsed PKCS#7 SignedData"
        );

        Ok(SignedData {
            version,
            digest_algorithms,
            content_type: encap_content_type,
            certificates,
            crl_count,
            signer_count,
        })
    }

    /// Encodes a certificates-only SignedData in its ContentInfo.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        if !self.is_degenerate() {
            return Err(Error::NotDegenerate);
        }
        let digest_algorithms = self
            .digest_algorithms
            .iter()
            .map(|alg| alg.encode())
            .collect::<std::result::Result<Vec<Element>, _>>()?;
        let certificates = self
            .certificates
            .iter()
            .map(|der| Tlv::from_der(der).map(Element::Raw))
            .collect::<std::result::Result<Vec<Element>, _>>()?;

        let mut signed_data = vec![
            Element::Integer(Integer::from(self.version)),
            Element::Set(digest_algorithms),
            Element::Sequence(vec![Element::ObjectIdentifier(self.content_type.clone())]),
        ];
        if !certificates.is_empty() {
            signed_data.push(Element::ContextSpecific {
                slot: 0,
                elements: certificates,
            });
        }
        signed_data.push(Element::Set(Vec::new()));

        let content_info = ContentInfo::new(OID_SIGNED_DATA, Some(Element::Sequence(signed_data)))?;
        let element = content_info.encode()?;
        Ok(element.to_der()?)
    }
}

impl ToPem for SignedData {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::Pkcs7
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()?))
    }
}

impl FromPem for SignedData {
    type Error = Error;

    fn expected_label() -> Label {
        Label::Pkcs7
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(Error::UnexpectedLabel(pem.label()));
        }
        Self::from_der(pem.body())
    }
}
