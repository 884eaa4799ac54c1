#![forbid(unsafe_code)]

//! Resolution of signature reference URIs to the bytes they denote.

use crate::container::Container;
use crate::naming;
use std::collections::HashMap;
use std::ops::Range;
use vellum_core::Error;
use vellum_xml::xpath::{self, SameDocumentRef};
use vellum_xml::XmlDocument;

/// The target of a dereferenced URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dereferenced<'a> {
    /// Raw octets of a container entry.
    Entry { name: &'a str, data: &'a [u8] },
    /// An element of the signature document, as its source text.
    Element { id: &'a str, data: &'a [u8] },
    /// The whole signature document.
    Document(&'a [u8]),
}

impl<'a> Dereferenced<'a> {
    pub fn data(&self) -> &'a [u8] {
        match *self {
            Dereferenced::Entry { data, .. }
            | Dereferenced::Element { data, .. }
            | Dereferenced::Document(data) => data,
        }
    }

    pub fn is_same_document(&self) -> bool {
        !matches!(self, Dereferenced::Entry { .. })
    }
}

/// Resolves reference URIs for the signature primitive.
pub trait UriDereferencer {
    /// Fails with [`Error::UnresolvableReference`] when nothing matches.
    fn dereference(&self, uri: &str) -> Result<Dereferenced<'_>, Error>;
}

/// Dereferencer bound to one container and one signature document.
///
/// Same-document URIs resolve inside the signature document; all other URIs
/// are mapped to entry names with the format's decoding rules.
pub struct ContainerDereferencer<'a> {
    container: &'a Container<'a>,
    signature_document: &'a XmlDocument,
    ids: HashMap<String, Option<Range<usize>>>,
}

impl<'a> ContainerDereferencer<'a> {
    pub fn new(
        container: &'a Container<'a>,
        signature_document: &'a XmlDocument,
    ) -> Result<Self, Error> {
        let doc = signature_document.parse_doc()?;
        let ids = XmlDocument::build_id_map(&doc)
            .into_iter()
            .map(|(id, node_id)| {
                let range = node_id.and_then(|n| doc.get_node(n)).map(|n| n.range());
                (id, range)
            })
            .collect();
        Ok(Self {
            container,
            signature_document,
            ids,
        })
    }
}

impl UriDereferencer for ContainerDereferencer<'_> {
    fn dereference(&self, uri: &str) -> Result<Dereferenced<'_>, Error> {
        match xpath::parse_same_document_ref(uri) {
            Some(SameDocumentRef::WholeDocument) => {
                return Ok(Dereferenced::Document(self.signature_document.as_bytes()));
            }
            Some(SameDocumentRef::Id(id)) => {
                let (id, range) = self
                    .ids
                    .get_key_value(id)
                    .ok_or_else(|| Error::UnresolvableReference(uri.to_owned()))?;
                let Some(range) = range else {
                    tracing::warn!(uri, "Id is carried by more than one element");
                    return Err(Error::UnresolvableReference(uri.to_owned()));
                };
                let data = self
                    .signature_document
                    .slice(range.clone())
                    .ok_or_else(|| Error::UnresolvableReference(uri.to_owned()))?;
                return Ok(Dereferenced::Element { id: id.as_str(), data });
            }
            None => {}
        }

        let name = naming::decode_reference_uri(self.container.content_type(), uri)
            .ok_or_else(|| Error::UnresolvableReference(uri.to_owned()))?;
        let entry = self
            .container
            .entry(&name)
            .ok_or_else(|| Error::UnresolvableReference(uri.to_owned()))?;
        Ok(Dereferenced::Entry {
            name: entry.name(),
            data: entry.data(),
        })
    }
}
