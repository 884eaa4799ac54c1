#![forbid(unsafe_code)]

//! Coverage and baseline checks.
//!
//! A validated signature must name every entry of the container that is
//! subject to signing. For formats that accept an original document, the
//! signed entries are additionally compared against that baseline to catch
//! additions and deletions made after signing.

use crate::signature::{EmbeddedSignature, Reference};
use std::collections::HashSet;
use tracing::{debug, warn};
use vellum_container::{naming, Container};
use vellum_core::{ContentType, Error};

/// Decoded entry names referenced by one signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceUriSet {
    names: HashSet<String>,
}

impl ReferenceUriSet {
    /// Collect the entry names of SignedInfo and manifest references.
    /// Same-document references are not entry names and are left out.
    pub fn from_signature(content_type: ContentType, signature: &EmbeddedSignature) -> Self {
        let names = signature
            .all_references()
            .filter_map(|r| naming::decode_reference_uri(content_type, &r.uri))
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Entries of `container` that must be signed, in stored order.
pub fn to_be_signed<'c>(container: &'c Container<'_>) -> impl Iterator<Item = &'c str> + 'c {
    let content_type = container.content_type();
    container
        .files()
        .map(|e| e.name())
        .filter(move |name| naming::is_to_be_signed(content_type, name))
}

/// Fail with [`Error::UnsignedContentDetected`] when a to-be-signed entry is
/// not named by the signature. Plain XML documents have no entries to cover.
pub fn check_coverage(container: &Container<'_>, references: &ReferenceUriSet) -> Result<(), Error> {
    if !container.content_type().requires_coverage() {
        return Ok(());
    }
    let missing: Vec<&str> = to_be_signed(container)
        .filter(|name| !references.contains(name))
        .collect();
    if missing.is_empty() {
        debug!(referenced = references.len(), "all entries covered");
        return Ok(());
    }
    warn!(?missing, "entries not covered by signature");
    Err(Error::UnsignedContentDetected(missing.join(", ")))
}

/// Compare the content signed by `signature` with the original document.
///
/// Every untyped container reference, from SignedInfo or a signed manifest,
/// must name an entry present in
/// `baseline` whose raw bytes match the reference digest, and every
/// to-be-signed entry of `baseline` must be named by such a reference.
pub fn check_baseline(
    content_type: ContentType,
    signature: &EmbeddedSignature,
    baseline: &Container<'_>,
) -> Result<(), Error> {
    if !content_type.supports_baseline() {
        return Err(Error::UnsupportedBaseline(content_type.to_string()));
    }

    let mut signed = HashSet::new();
    for reference in signature.all_references().filter(|r| !r.is_typed()) {
        let Some(name) = naming::decode_reference_uri(content_type, &reference.uri) else {
            continue;
        };
        check_baseline_entry(baseline, &name, reference)?;
        signed.insert(name);
    }

    if let Some(deleted) = to_be_signed(baseline).find(|name| !signed.contains(*name)) {
        warn!(entry = %deleted, "original entry no longer signed");
        return Err(Error::TamperedContent(format!(
            "entry {deleted} of the original document is not signed"
        )));
    }
    Ok(())
}

fn check_baseline_entry(baseline: &Container<'_>, name: &str, reference: &Reference) -> Result<(), Error> {
    let entry = baseline.entry(name).ok_or_else(|| {
        warn!(entry = %name, "signed entry absent from original document");
        Error::TamperedContent(format!("entry {name} was added after signing"))
    })?;

    let matches = vellum_crypto::digest::matches(
        &reference.digest_method,
        entry.data(),
        &reference.digest_value,
    )
    .map_err(|e| Error::TamperedContent(format!("cannot digest original entry {name}: {e}")))?;
    if !matches {
        warn!(entry = %name, "original entry digest differs");
        return Err(Error::TamperedContent(format!(
            "entry {name} differs from the original document"
        )));
    }
    Ok(())
}
