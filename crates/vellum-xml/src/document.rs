#![forbid(unsafe_code)]

//! Owned XML document wrapper over roxmltree with ID attribute lookup.

use vellum_core::Error;
use std::collections::HashMap;
use std::ops::Range;

/// ID attribute names recognised on any element.
pub const ID_ATTRIBUTES: [&str; 3] = ["Id", "ID", "id"];

/// An owned XML document.
///
/// To work with the parsed tree, call [`XmlDocument::parse_doc`] which
/// returns a temporary `roxmltree::Document` borrowing from the text.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    text: String,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        roxmltree::Document::parse_with_options(&text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        Ok(Self { text })
    }

    /// Parse and validate XML from bytes. A leading UTF-8 byte order mark is dropped.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Bytes of a source range, typically `node.range()` of a parsed element.
    pub fn slice(&self, range: Range<usize>) -> Option<&[u8]> {
        self.text.as_bytes().get(range)
    }

    /// Parse the stored text into a roxmltree document.
    ///
    /// The text was validated at construction, so this only fails if the
    /// parsing options changed in between.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Build the ID → NodeId mapping for a parsed document.
    ///
    /// An Id carried by more than one element maps to `None` and names no
    /// element at all.
    pub fn build_id_map(doc: &roxmltree::Document<'_>) -> HashMap<String, Option<roxmltree::NodeId>> {
        let mut map: HashMap<String, Option<roxmltree::NodeId>> = HashMap::new();
        for node in doc.descendants().filter(|n| n.is_element()) {
            for attr_name in ID_ATTRIBUTES {
                if let Some(val) = node.attribute(attr_name) {
                    map.entry(val.to_owned())
                        .and_modify(|slot| {
                            if *slot != Some(node.id()) {
                                *slot = None;
                            }
                        })
                        .or_insert(Some(node.id()));
                }
            }
        }
        map
    }

    /// The one element carrying `id`, or `None` when no element or several
    /// elements carry it.
    pub fn element_by_id<'a, 'input>(
        doc: &'a roxmltree::Document<'input>,
        id: &str,
    ) -> Option<roxmltree::Node<'a, 'input>> {
        let mut carriers = doc
            .descendants()
            .filter(|n| n.is_element() && ID_ATTRIBUTES.iter().any(|a| n.attribute(*a) == Some(id)));
        let first = carriers.next()?;
        carriers.next().is_none().then_some(first)
    }

    /// Find the first descendant element with the given local name and namespace.
    pub fn find_element<'a, 'input>(
        doc: &'a roxmltree::Document<'input>,
        ns: &str,
        local_name: &str,
    ) -> Option<roxmltree::Node<'a, 'input>> {
        doc.descendants().find(|n| crate::node::is_element(*n, ns, local_name))
    }

    /// Find all descendant elements with the given local name and namespace,
    /// in document order.
    pub fn find_elements<'a, 'input>(
        doc: &'a roxmltree::Document<'input>,
        ns: &str,
        local_name: &str,
    ) -> Vec<roxmltree::Node<'a, 'input>> {
        doc.descendants()
            .filter(|n| crate::node::is_element(*n, ns, local_name))
            .collect()
    }
}
