#![forbid(unsafe_code)]

//! OPC package relationships.
//!
//! Signature parts of an Office Open XML package are not found by name but
//! by walking relationships: `_rels/.rels` points at the digital signature
//! origin part, whose own relationships part lists the signature parts.

use crate::container::Container;
use tracing::{debug, warn};
use vellum_core::{algorithm, ns, Error};
use vellum_xml::{node, XmlDocument};

/// One `<Relationship>` of a relationships part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Parse a relationships part.
pub fn parse_relationships(data: &[u8]) -> Result<Vec<Relationship>, Error> {
    let xml = XmlDocument::parse_bytes(data)?;
    let doc = xml.parse_doc()?;
    let root = doc.root_element();
    if !node::is_element(root, ns::RELATIONSHIPS, "Relationships") {
        return Err(Error::XmlStructure(format!(
            "expected Relationships root, found {}",
            root.tag_name().name()
        )));
    }
    node::find_child_elements(root, ns::RELATIONSHIPS, ns::node::RELATIONSHIP)
        .into_iter()
        .map(|rel| {
            let attr = |name: &str| {
                rel.attribute(name)
                    .map(str::to_owned)
                    .ok_or_else(|| Error::MissingAttribute(format!("{name} on Relationship")))
            };
            Ok(Relationship {
                id: attr(ns::attr::ID)?,
                rel_type: attr(ns::attr::TYPE)?,
                target: attr(ns::attr::TARGET)?,
                external: rel.attribute(ns::attr::TARGET_MODE) == Some("External"),
            })
        })
        .collect()
}

/// Name of the relationships part describing `source_part`.
///
/// The package itself (empty source) is described by `_rels/.rels`.
pub fn rels_part_name(source_part: &str) -> String {
    match source_part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if source_part.is_empty() => "_rels/.rels".to_owned(),
        None => format!("_rels/{source_part}.rels"),
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets start at the package root. The result is a part name
/// without leading `/`, as stored in the ZIP.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let base = source_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    normalize(base.split('/').chain(target.split('/')))
}

fn normalize<'s>(segments: impl Iterator<Item = &'s str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}

/// Part names of all signature parts, in relationship order.
///
/// A package without a digital signature origin has no signatures. A
/// registered signature part that is absent from the archive is skipped.
pub fn signature_part_names(container: &Container<'_>) -> Result<Vec<String>, Error> {
    let Some(origin) = find_origin_part(container)? else {
        debug!("OOXML package has no digital signature origin");
        return Ok(Vec::new());
    };

    let origin_rels = rels_part_name(&origin);
    let Some(entry) = container.entry(&origin_rels) else {
        debug!(part = %origin_rels, "digital signature origin has no relationships");
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for rel in parse_relationships(entry.data()).map_err(malformed)? {
        if rel.external || rel.rel_type != algorithm::REL_DIGITAL_SIGNATURE {
            continue;
        }
        let part = resolve_target(&origin, &rel.target);
        if container.entry(&part).is_none() {
            warn!(part = %part, "registered signature part missing from package");
            continue;
        }
        names.push(part);
    }
    Ok(names)
}

fn find_origin_part(container: &Container<'_>) -> Result<Option<String>, Error> {
    let Some(root_rels) = container.entry(&rels_part_name("")) else {
        return Ok(None);
    };
    let origin = parse_relationships(root_rels.data())
        .map_err(malformed)?
        .into_iter()
        .find(|rel| !rel.external && rel.rel_type == algorithm::REL_DIGITAL_SIGNATURE_ORIGIN)
        .map(|rel| resolve_target("", &rel.target));
    Ok(origin)
}

fn malformed(e: Error) -> Error {
    Error::MalformedContainer(format!("package relationships: {e}"))
}
