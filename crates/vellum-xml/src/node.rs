#![forbid(unsafe_code)]

//! Element navigation and text helpers shared by the signature parsers.

use base64::Engine;
use vellum_core::Error;

/// Whether `node` is an element with the given namespace and local name.
pub fn is_element(node: roxmltree::Node<'_, '_>, ns_uri: &str, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace().unwrap_or("") == ns_uri
}

pub fn find_child_element<'a, 'input>(
    parent: roxmltree::Node<'a, 'input>,
    ns_uri: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    parent.children().find(|n| is_element(*n, ns_uri, local_name))
}

pub fn find_child_elements<'a, 'input>(
    parent: roxmltree::Node<'a, 'input>,
    ns_uri: &str,
    local_name: &str,
) -> Vec<roxmltree::Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| is_element(*n, ns_uri, local_name))
        .collect()
}

/// Follow a path of `(namespace, local name)` steps through first-match children.
pub fn find_path<'a, 'input>(
    start: roxmltree::Node<'a, 'input>,
    path: &[(&str, &str)],
) -> Option<roxmltree::Node<'a, 'input>> {
    path.iter()
        .try_fold(start, |node, (ns_uri, local)| find_child_element(node, ns_uri, local))
}

/// Concatenated text of all descendant text nodes, trimmed.
///
/// Returns `None` for an element without any non-whitespace text.
pub fn text_content(node: roxmltree::Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Decode base64 text content, ignoring embedded whitespace and line breaks.
pub fn decode_base64(node: roxmltree::Node<'_, '_>) -> Result<Vec<u8>, Error> {
    let clean: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .flat_map(|t| t.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(&clean)
        .map_err(|e| Error::Base64(format!("{}: {e}", node.tag_name().name())))
}
