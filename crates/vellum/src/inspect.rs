#![forbid(unsafe_code)]

//! Structural inspection of signed documents.
//!
//! Reports what a document claims without validating anything: the located
//! signatures, their references, the certificate each one names and which
//! entries no reference covers.

use chrono::{DateTime, Utc};
use vellum_container::{locate, Container};
use vellum_core::{ContentType, Error};
use vellum_dsig::coverage::{to_be_signed, ReferenceUriSet};
use vellum_dsig::signature::signature_nodes;
use vellum_dsig::{EmbeddedSignature, KeyInfoKeySelector};
use vellum_xades::{Identity, QualifyingProperties};

/// What one `ds:Signature` element declares.
#[derive(Debug, Clone)]
pub struct SignatureSummary {
    pub part: String,
    pub index: usize,
    pub id: Option<String>,
    pub references: Vec<String>,
    /// Subject of the first KeyInfo certificate.
    pub signer: Option<String>,
    pub signing_time: Option<DateTime<Utc>>,
    pub role: Option<String>,
    pub timestamps: usize,
    pub identity: Option<Identity>,
    /// To-be-signed entries none of the references name.
    pub uncovered: Vec<String>,
    /// Set when the element could not be read as a signature.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InspectionReport {
    pub content_type: ContentType,
    pub signatures: Vec<SignatureSummary>,
}

/// Summarize the signatures of `document` without cryptographic checks.
pub fn inspect(document: &[u8], content_type: ContentType) -> Result<InspectionReport, Error> {
    let container = Container::open(document, content_type)?;
    let mut signatures = Vec::new();

    for part in locate(&container)? {
        let doc = part.document.parse_doc()?;
        for (index, node) in signature_nodes(&doc).into_iter().enumerate() {
            let summary = match EmbeddedSignature::from_node(node, index) {
                Ok(signature) => {
                    let properties = QualifyingProperties::extract(node, &signature);
                    summarize(&container, &part.name, &signature, properties, Identity::extract(node, &signature))
                }
                Err(e) => SignatureSummary {
                    part: part.name.clone(),
                    index,
                    id: None,
                    references: Vec::new(),
                    signer: None,
                    signing_time: None,
                    role: None,
                    timestamps: 0,
                    identity: None,
                    uncovered: Vec::new(),
                    error: Some(e.to_string()),
                },
            };
            signatures.push(summary);
        }
    }

    Ok(InspectionReport {
        content_type,
        signatures,
    })
}

fn summarize(
    container: &Container<'_>,
    part: &str,
    signature: &EmbeddedSignature,
    properties: QualifyingProperties,
    identity: Option<Identity>,
) -> SignatureSummary {
    let covered = ReferenceUriSet::from_signature(container.content_type(), signature);
    let uncovered = if container.content_type().requires_coverage() {
        to_be_signed(container)
            .filter(|name| !covered.contains(name))
            .map(str::to_owned)
            .collect()
    } else {
        Vec::new()
    };
    let (signer, error) = match KeyInfoKeySelector.select(signature) {
        Ok(selected) => (Some(selected.signer.subject()), None),
        Err(rejection) => (None, Some(rejection.to_string())),
    };

    SignatureSummary {
        part: part.to_owned(),
        index: signature.index,
        id: signature.id.clone(),
        references: signature.all_references().map(|r| r.uri.clone()).collect(),
        signer,
        signing_time: properties.signing_time,
        role: properties.claimed_role,
        timestamps: properties.timestamps.len(),
        identity,
        uncovered,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SIGNER_DER: &[u8] = include_bytes!("../../../testdata/signer.der");

    fn signature_entry(uris: &[&str]) -> String {
        let cert = base64::engine::general_purpose::STANDARD.encode(SIGNER_DER);
        let references: String = uris
            .iter()
            .map(|uri| {
                format!(
                    r#"<ds:Reference URI="{uri}"><ds:DigestMethod Algorithm="http://www.w3.org/2001/04/xmlenc#sha256"/><ds:DigestValue>AAAA</ds:DigestValue></ds:Reference>"#
                )
            })
            .collect();
        format!(
            r#"<ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#" Id="s1"><ds:SignedInfo><ds:SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"/>{references}</ds:SignedInfo><ds:SignatureValue>AA==</ds:SignatureValue><ds:KeyInfo><ds:X509Data><ds:X509Certificate>{cert}</ds:X509Certificate></ds:X509Data></ds:KeyInfo></ds:Signature>"#
        )
    }

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_inspect_reports_uncovered_entries() {
        let signature = signature_entry(&["a.txt"]);
        let entries: [(&str, &[u8]); 3] = [
            ("a.txt", b"a"),
            ("b.txt", b"b"),
            ("META-INF/signatures.xml", signature.as_bytes()),
        ];
        let report = inspect(&build_zip(&entries), ContentType::Zip).unwrap();

        assert_eq!(report.signatures.len(), 1);
        let summary = &report.signatures[0];
        assert_eq!(summary.id.as_deref(), Some("s1"));
        assert_eq!(summary.references, vec!["a.txt"]);
        assert_eq!(summary.uncovered, vec!["b.txt"]);
        assert!(summary.signer.as_deref().unwrap().contains("Alice Signer"));
        assert!(summary.error.is_none());
    }

    #[test]
    fn test_inspect_unsigned() {
        let entries: [(&str, &[u8]); 1] = [("a.txt", b"a")];
        let report = inspect(&build_zip(&entries), ContentType::Zip).unwrap();
        assert!(report.signatures.is_empty());
    }

    #[test]
    fn test_inspect_plain_xml_has_no_coverage() {
        let xml = format!("<doc><data Id=\"d\"/>{}</doc>", signature_entry(&["#d"]));
        let report = inspect(xml.as_bytes(), ContentType::Xml).unwrap();
        assert_eq!(report.signatures[0].part, "");
        assert!(report.signatures[0].uncovered.is_empty());
    }
}
