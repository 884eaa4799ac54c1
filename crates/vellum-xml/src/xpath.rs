#![forbid(unsafe_code)]

//! Same-document URI references.
//!
//! Supported forms:
//! - `#id-value`
//! - `#xpointer(id('id-value'))`
//! - `#xpointer(/)` and the empty URI, both denoting the whole document

use vellum_core::Error;
use std::collections::HashMap;

/// A reference that resolves inside the document carrying the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameDocumentRef<'u> {
    WholeDocument,
    Id(&'u str),
}

/// Classify a URI as a same-document reference, or `None` for external URIs.
pub fn parse_same_document_ref(uri: &str) -> Option<SameDocumentRef<'_>> {
    if uri.is_empty() {
        return Some(SameDocumentRef::WholeDocument);
    }
    let fragment = uri.strip_prefix('#')?;
    if fragment == "xpointer(/)" {
        return Some(SameDocumentRef::WholeDocument);
    }
    Some(SameDocumentRef::Id(parse_xpointer_id(fragment).unwrap_or(fragment)))
}

/// Parse an `xpointer(id('...'))` expression and return the ID value.
pub fn parse_xpointer_id(expr: &str) -> Option<&str> {
    let inner = expr.strip_prefix("xpointer(id('")?;
    inner.strip_suffix("'))")
}

/// Resolve an ID value in a parsed document using a pre-built ID map.
pub fn resolve_id<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    id_map: &HashMap<String, roxmltree::NodeId>,
    id: &str,
) -> Result<roxmltree::Node<'a, 'input>, Error> {
    id_map
        .get(id)
        .and_then(|nid| doc.get_node(*nid))
        .ok_or_else(|| Error::UnresolvableReference(format!("#{id}")))
}
