#![forbid(unsafe_code)]

//! Owned model of a `ds:Signature` element.

use std::ops::Range;
use vellum_core::{ns, Error};
use vellum_xml::node::{decode_base64, find_child_element, find_child_elements, is_element};
use vellum_xml::xpath::{parse_same_document_ref, SameDocumentRef};
use vellum_xml::XmlDocument;

/// A `ds:Reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: Option<String>,
    pub uri: String,
    /// `Type` attribute; untyped references point at signed content.
    pub type_uri: Option<String>,
    pub digest_method: String,
    pub digest_value: Vec<u8>,
    /// Transform algorithm URIs in order.
    pub transforms: Vec<String>,
}

impl Reference {
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Result<Self, Error> {
        let digest_method = find_child_element(node, ns::DSIG, ns::node::DIGEST_METHOD)
            .ok_or_else(|| Error::MissingElement("DigestMethod".into()))?
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on DigestMethod".into()))?
            .to_owned();

        let digest_value = find_child_element(node, ns::DSIG, ns::node::DIGEST_VALUE)
            .ok_or_else(|| Error::MissingElement("DigestValue".into()))
            .and_then(decode_base64)?;

        let transforms = find_child_element(node, ns::DSIG, ns::node::TRANSFORMS)
            .map(|t| {
                find_child_elements(t, ns::DSIG, ns::node::TRANSFORM)
                    .into_iter()
                    .filter_map(|t| t.attribute(ns::attr::ALGORITHM).map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            uri: node.attribute(ns::attr::URI).unwrap_or("").to_owned(),
            type_uri: node.attribute(ns::attr::TYPE).map(str::to_owned),
            digest_method,
            digest_value,
            transforms,
        })
    }

    pub fn is_typed(&self) -> bool {
        self.type_uri.is_some()
    }

    /// Whether the reference points inside the signature document.
    pub fn is_same_document(&self) -> bool {
        vellum_xml::xpath::parse_same_document_ref(&self.uri).is_some()
    }
}

/// A signature located inside a signature part.
#[derive(Debug, Clone)]
pub struct EmbeddedSignature {
    /// Position among the signatures of its part, in document order.
    pub index: usize,
    pub id: Option<String>,
    pub signature_method: String,
    /// References of `SignedInfo`.
    pub references: Vec<Reference>,
    /// References of the `ds:Manifest` elements a SignedInfo reference
    /// targets, directly or through their `ds:Object`, such as the OOXML
    /// package object. Unsigned manifests contribute nothing.
    pub manifest_references: Vec<Reference>,
    /// DER of every `KeyInfo/X509Data/X509Certificate`, in document order.
    pub key_info_certificates: Vec<Vec<u8>>,
    pub signature_value: Vec<u8>,
    /// Byte range of the element in its signature document.
    pub range: Range<usize>,
}

impl EmbeddedSignature {
    pub fn from_node(node: roxmltree::Node<'_, '_>, index: usize) -> Result<Self, Error> {
        let signed_info = find_child_element(node, ns::DSIG, ns::node::SIGNED_INFO)
            .ok_or_else(|| Error::MissingElement("SignedInfo".into()))?;

        let signature_method = find_child_element(signed_info, ns::DSIG, ns::node::SIGNATURE_METHOD)
            .ok_or_else(|| Error::MissingElement("SignatureMethod".into()))?
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on SignatureMethod".into()))?
            .to_owned();

        let references = find_child_elements(signed_info, ns::DSIG, ns::node::REFERENCE)
            .into_iter()
            .map(Reference::from_node)
            .collect::<Result<Vec<_>, _>>()?;

        let mut manifests: Vec<roxmltree::Node<'_, '_>> = Vec::new();
        for reference in &references {
            let Some(target) = signed_element(node, reference) else {
                continue;
            };
            let found = if is_element(target, ns::DSIG, ns::node::MANIFEST) {
                vec![target]
            } else if is_element(target, ns::DSIG, ns::node::OBJECT) {
                find_child_elements(target, ns::DSIG, ns::node::MANIFEST)
            } else {
                Vec::new()
            };
            for manifest in found {
                if !manifests.iter().any(|m| m.id() == manifest.id()) {
                    manifests.push(manifest);
                }
            }
        }

        let mut manifest_references = Vec::new();
        for manifest in manifests {
            for reference in find_child_elements(manifest, ns::DSIG, ns::node::REFERENCE) {
                manifest_references.push(Reference::from_node(reference)?);
            }
        }

        let mut key_info_certificates = Vec::new();
        if let Some(key_info) = find_child_element(node, ns::DSIG, ns::node::KEY_INFO) {
            for x509_data in find_child_elements(key_info, ns::DSIG, ns::node::X509_DATA) {
                for cert in find_child_elements(x509_data, ns::DSIG, ns::node::X509_CERTIFICATE) {
                    key_info_certificates.push(decode_base64(cert)?);
                }
            }
        }

        let signature_value = find_child_element(node, ns::DSIG, ns::node::SIGNATURE_VALUE)
            .ok_or_else(|| Error::MissingElement("SignatureValue".into()))
            .and_then(decode_base64)?;

        Ok(Self {
            index,
            id: node.attribute(ns::attr::ID).map(str::to_owned),
            signature_method,
            references,
            manifest_references,
            key_info_certificates,
            signature_value,
            range: node.range(),
        })
    }

    /// All references that name signed content, SignedInfo first.
    pub fn all_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().chain(self.manifest_references.iter())
    }

    /// The first SignedInfo reference of the given `Type`.
    pub fn reference_of_type(&self, type_uri: &str) -> Option<&Reference> {
        self.references
            .iter()
            .find(|r| r.type_uri.as_deref() == Some(type_uri))
    }

    /// A human-readable label for log lines.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("#{} ({id})", self.index),
            None => format!("#{}", self.index),
        }
    }
}

/// The element a same-document reference of the signature at `node` points
/// at. `None` for external references, the whole-document reference and Ids
/// that are missing or carried by more than one element.
pub fn signed_element<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    reference: &Reference,
) -> Option<roxmltree::Node<'a, 'input>> {
    match parse_same_document_ref(&reference.uri)? {
        SameDocumentRef::Id(id) => XmlDocument::element_by_id(node.document(), id),
        SameDocumentRef::WholeDocument => None,
    }
}

/// Parse every signature of a document, in document order.
pub fn parse_all(document: &XmlDocument) -> Result<Vec<EmbeddedSignature>, Error> {
    let doc = document.parse_doc()?;
    signature_nodes(&doc)
        .into_iter()
        .enumerate()
        .map(|(index, node)| EmbeddedSignature::from_node(node, index))
        .collect()
}

/// Every `ds:Signature` element of a parsed document, in document order.
pub fn signature_nodes<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
) -> Vec<roxmltree::Node<'a, 'input>> {
    XmlDocument::find_elements(doc, ns::DSIG, ns::node::SIGNATURE)
}
