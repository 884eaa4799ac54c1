#![forbid(unsafe_code)]

//! Finds the XML documents that carry signatures inside a container.

use crate::container::Container;
use crate::naming::{self, ODF_SIGNATURE_ENTRY};
use crate::ooxml;
use tracing::debug;
use vellum_core::{ContentType, Error};
use vellum_xml::XmlDocument;

/// A parsed XML document holding one or more `ds:Signature` elements.
#[derive(Debug, Clone)]
pub struct SignaturePart {
    /// Entry name inside the container; empty for plain XML documents.
    pub name: String,
    pub document: XmlDocument,
}

/// Locate every signature-bearing document of a container.
///
/// An empty result means the document is unsigned, which is not an error.
/// Signature entries that are not well-formed XML make the whole container
/// malformed.
pub fn locate(container: &Container<'_>) -> Result<Vec<SignaturePart>, Error> {
    let names: Vec<String> = match container.content_type() {
        ContentType::Xml => {
            let document = XmlDocument::parse_bytes(container.source())
                .map_err(|e| Error::MalformedContainer(format!("XML document: {e}")))?;
            return Ok(vec![SignaturePart {
                name: String::new(),
                document,
            }]);
        }
        ContentType::Odf => container
            .entry(ODF_SIGNATURE_ENTRY)
            .map(|e| e.name().to_owned())
            .into_iter()
            .collect(),
        ContentType::Zip | ContentType::Asic => container
            .files()
            .find(|e| naming::is_signature_entry(container.content_type(), e.name()))
            .map(|e| e.name().to_owned())
            .into_iter()
            .collect(),
        ContentType::Ooxml => ooxml::signature_part_names(container)?,
    };

    let mut parts = Vec::with_capacity(names.len());
    for name in names {
        let entry = container
            .entry(&name)
            .ok_or_else(|| Error::MalformedContainer(format!("missing entry {name}")))?;
        let document = XmlDocument::parse_bytes(entry.data())
            .map_err(|e| Error::MalformedContainer(format!("signature entry {name}: {e}")))?;
        debug!(part = %name, "located signature part");
        parts.push(SignaturePart { name, document });
    }
    Ok(parts)
}
