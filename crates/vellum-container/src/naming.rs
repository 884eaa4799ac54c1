#![forbid(unsafe_code)]

//! Entry naming conventions per format: which entries hold signatures,
//! which entries must be signed, and how reference URIs map to entry names.
//!
//! The dereferencer and the coverage checker both go through
//! [`decode_reference_uri`], so a name that resolves for digesting is the
//! same name that counts as covered.

use vellum_core::ContentType;
use vellum_xml::xpath;

/// Fixed signature entry of OpenDocument packages.
pub const ODF_SIGNATURE_ENTRY: &str = "META-INF/documentsignatures.xml";

pub const MIMETYPE_ENTRY: &str = "mimetype";

/// ASiC entries that describe the container rather than carry content.
pub const ASIC_RESERVED_ENTRIES: [&str; 4] = [
    MIMETYPE_ENTRY,
    "META-INF/container.xml",
    "META-INF/manifest.xml",
    "META-INF/metadata.xml",
];

pub const OOXML_CONTENT_TYPES: &str = "[Content_Types].xml";
pub const OOXML_SIGNATURE_DIR: &str = "_xmlsignatures/";

/// Whether an entry name is a signature entry for the format.
///
/// For ODF this is every `META-INF/*signatures*` file (document and macro
/// signatures); the locator itself only reads [`ODF_SIGNATURE_ENTRY`].
pub fn is_signature_entry(content_type: ContentType, name: &str) -> bool {
    match content_type {
        ContentType::Xml => false,
        ContentType::Odf | ContentType::Zip => {
            name.starts_with("META-INF/") && name.contains("signatures")
        }
        ContentType::Asic => {
            name.starts_with("META-INF/") && name.ends_with(".xml") && name.contains("signatures")
        }
        ContentType::Ooxml => name.starts_with(OOXML_SIGNATURE_DIR),
    }
}

/// Whether a file entry must be covered by a signature reference.
pub fn is_to_be_signed(content_type: ContentType, name: &str) -> bool {
    if name.ends_with('/') || is_signature_entry(content_type, name) {
        return false;
    }
    match content_type {
        ContentType::Xml => false,
        ContentType::Zip => true,
        ContentType::Odf => name != MIMETYPE_ENTRY,
        ContentType::Asic => !ASIC_RESERVED_ENTRIES.contains(&name),
        ContentType::Ooxml => name != OOXML_CONTENT_TYPES,
    }
}

/// Map a reference URI to the container entry name it denotes.
///
/// Returns `None` for same-document references (`""`, `#id`), which resolve
/// inside the signature document instead.
///
/// - generic ZIP and ASiC: form decoding, `+` is a space
/// - ODF: percent decoding only, so `%20` is a space and `+` is literal
/// - OOXML: package part name, the `?ContentType=` query and the leading `/` dropped
pub fn decode_reference_uri(content_type: ContentType, uri: &str) -> Option<String> {
    if xpath::parse_same_document_ref(uri).is_some() {
        return None;
    }
    let decoded = match content_type {
        ContentType::Xml => return None,
        ContentType::Zip | ContentType::Asic => percent_decode(&uri.replace('+', " ")),
        ContentType::Odf => percent_decode(uri),
        ContentType::Ooxml => {
            let path = uri.split_once('?').map_or(uri, |(path, _)| path);
            percent_decode(path.strip_prefix('/').unwrap_or(path))
        }
    };
    Some(decoded)
}

fn percent_decode(text: &str) -> String {
    match urlencoding::decode(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_owned(),
    }
}
