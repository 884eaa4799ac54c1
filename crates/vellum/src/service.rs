#![forbid(unsafe_code)]

//! Per-format document services.
//!
//! A [`DocumentService`] runs one verification call through its stages:
//! the container is opened and its signature parts located, then every
//! signature is validated, checked for coverage, described and handed to
//! the trust delegate. Container-level failures abort the call; anything
//! that only concerns one signature drops that signature and the call
//! carries on with the next.

use crate::config::EngineConfig;
use crate::visualize::{render, Visualization};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vellum_container::{locate, Container, ContainerDereferencer, SignaturePart};
use vellum_core::{ContentType, Error, Rejection};
use vellum_crypto::Certificate;
use vellum_dsig::coverage::{check_baseline, check_coverage, ReferenceUriSet};
use vellum_dsig::signature::signature_nodes;
use vellum_dsig::{EmbeddedSignature, SignaturePrimitive, SignatureValidator};
use vellum_trust::{TrustContext, TrustDelegate};
use vellum_xades::{Identity, QualifyingProperties};

/// An accepted signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureInfo {
    pub signer: Certificate,
    pub signing_time: Option<DateTime<Utc>>,
    /// First XAdES claimed role.
    pub role: Option<String>,
    /// eID identity facet, when the signature signs one.
    pub identity: Option<Identity>,
    /// Signature part the signature was found in; empty for plain XML.
    pub part: String,
    /// Position of the signature within its part.
    pub index: usize,
    pub id: Option<String>,
}

/// A signature that was found but not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSignature {
    pub part: String,
    pub index: usize,
    pub id: Option<String>,
    pub rejection: Rejection,
}

/// Outcome of one verification call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    pub signatures: Vec<SignatureInfo>,
    pub rejected: Vec<RejectedSignature>,
}

impl VerificationReport {
    /// Whether the document carries no signature at all.
    pub fn is_unsigned(&self) -> bool {
        self.signatures.is_empty() && self.rejected.is_empty()
    }
}

/// Signature verification for one content type.
///
/// Holds only immutable configuration and shared collaborators, so one
/// instance can serve concurrent calls.
#[derive(Clone)]
pub struct DocumentService {
    content_type: ContentType,
    validator: SignatureValidator,
    trust: TrustDelegate,
    config: EngineConfig,
}

impl DocumentService {
    pub fn new(
        content_type: ContentType,
        primitive: Arc<dyn SignaturePrimitive>,
        trust: Arc<dyn TrustContext>,
        config: EngineConfig,
    ) -> Self {
        Self {
            content_type,
            validator: SignatureValidator::new(primitive),
            trust: TrustDelegate::new(trust, config.trust),
            config,
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Verify every signature of `document` and return the accepted ones,
    /// in part order and document order within a part.
    ///
    /// `original` is the document as it was before signing; only generic
    /// ZIP and ASiC containers accept one.
    pub fn verify_signatures(
        &self,
        document: &[u8],
        original: Option<&[u8]>,
    ) -> Result<Vec<SignatureInfo>, Error> {
        Ok(self.verify_report(document, original)?.signatures)
    }

    /// Like [`verify_signatures`](Self::verify_signatures), also reporting
    /// why signatures were rejected.
    pub fn verify_report(
        &self,
        document: &[u8],
        original: Option<&[u8]>,
    ) -> Result<VerificationReport, Error> {
        if original.is_some() && !self.content_type.supports_baseline() {
            return Err(Error::UnsupportedBaseline(self.content_type.to_string()));
        }

        let container = Container::open(document, self.content_type)?;
        let baseline = original
            .map(|bytes| Container::open(bytes, self.content_type))
            .transpose()?;

        let parts = locate(&container)?;
        debug!(content_type = %self.content_type, parts = parts.len(), "located signature parts");

        let mut report = VerificationReport::default();
        for part in &parts {
            self.verify_part(&container, baseline.as_ref(), part, &mut report)?;
        }

        info!(
            content_type = %self.content_type,
            accepted = report.signatures.len(),
            rejected = report.rejected.len(),
            "verification finished"
        );
        Ok(report)
    }

    fn verify_part(
        &self,
        container: &Container<'_>,
        baseline: Option<&Container<'_>>,
        part: &SignaturePart,
        report: &mut VerificationReport,
    ) -> Result<(), Error> {
        let malformed = |e: Error| Error::MalformedContainer(format!("signature part {}: {e}", part.name));
        let doc = part.document.parse_doc().map_err(malformed)?;
        let dereferencer = ContainerDereferencer::new(container, &part.document).map_err(malformed)?;

        for (index, node) in signature_nodes(&doc).into_iter().enumerate() {
            let signature = match EmbeddedSignature::from_node(node, index) {
                Ok(signature) => signature,
                Err(e) => {
                    report.reject(part, index, None, Rejection::CryptographicFailure(e.to_string()));
                    continue;
                }
            };

            let validated = match self.validator.validate(&part.document, &signature, &dereferencer) {
                Ok(validated) => validated,
                Err(rejection) => {
                    report.reject(part, index, signature.id.clone(), rejection);
                    continue;
                }
            };

            let references = ReferenceUriSet::from_signature(self.content_type, &signature);
            check_coverage(container, &references)?;
            if let Some(baseline) = baseline {
                check_baseline(self.content_type, &signature, baseline)?;
            }

            let properties = QualifyingProperties::extract(node, &signature);
            let identity = Identity::extract(node, &signature);

            let outcome = match self
                .trust
                .evaluate(&validated.signer, &properties, &validated.key_info_chain)
            {
                Ok(outcome) => outcome,
                Err(rejection) => {
                    report.reject(part, index, signature.id.clone(), rejection);
                    continue;
                }
            };

            debug!(
                part = %part.name,
                signature = %signature.label(),
                validation_time = %outcome.validation_time,
                "signature accepted"
            );
            report.signatures.push(SignatureInfo {
                signer: validated.signer,
                signing_time: properties.signing_time,
                role: properties.claimed_role,
                identity,
                part: part.name.clone(),
                index,
                id: signature.id,
            });
        }
        Ok(())
    }

    /// Render `document` for display: plain XML as itself, archives as a
    /// listing of their signed entries.
    pub fn visualize_document(&self, document: &[u8]) -> Result<Visualization, Error> {
        let container = Container::open(document, self.content_type)?;
        Ok(render(&container))
    }

    /// Raw bytes of the named archive entry; the whole document for plain XML.
    pub fn find_document(&self, document: &[u8], name: &str) -> Result<Option<Vec<u8>>, Error> {
        let container = Container::open(document, self.content_type)?;
        if !container.is_archive() {
            return Ok(Some(document.to_vec()));
        }
        Ok(container.entry(name).map(|entry| entry.data().to_vec()))
    }
}

impl VerificationReport {
    fn reject(&mut self, part: &SignaturePart, index: usize, id: Option<String>, rejection: Rejection) {
        warn!(part = %part.name, index, id = ?id, %rejection, "signature rejected");
        self.rejected.push(RejectedSignature {
            part: part.name.clone(),
            index,
            id,
            rejection,
        });
    }
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("content_type", &self.content_type)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use std::io::Write;
    use vellum_core::algorithm;
    use vellum_crypto::{Crl, OcspResponse, TimeStampToken};
    use vellum_dsig::{ValidationContext, VerifyResult};
    use vellum_trust::TrustError;
    use vellum_xades::Gender;
    use zip::write::SimpleFileOptions;

    const SIGNER_DER: &[u8] = include_bytes!("../../../testdata/signer.der");
    const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

    /// Accepts a signature when every reference digest matches.
    struct DigestPrimitive;

    impl SignaturePrimitive for DigestPrimitive {
        fn validate(&self, ctx: &ValidationContext<'_>) -> Result<VerifyResult, Error> {
            for reference in ctx.signature.all_references() {
                let target = ctx.dereferencer.dereference(&reference.uri)?;
                if !vellum_crypto::digest::matches(&reference.digest_method, target.data(), &reference.digest_value)? {
                    return Ok(VerifyResult::Invalid {
                        reason: format!("digest mismatch for {}", reference.uri),
                    });
                }
            }
            Ok(VerifyResult::Valid)
        }
    }

    struct FixedTrust(Result<(), TrustError>);

    impl TrustContext for FixedTrust {
        fn validate_chain(
            &self,
            _chain: &[Certificate],
            _at: DateTime<Utc>,
            _ocsp_responses: &[OcspResponse],
            _crls: &[Crl],
        ) -> Result<(), TrustError> {
            self.0.clone()
        }

        fn validate_timestamp_token(
            &self,
            _token: &TimeStampToken,
            _ocsp_responses: &[OcspResponse],
            _crls: &[Crl],
        ) -> Result<(), TrustError> {
            Ok(())
        }
    }

    fn service(content_type: ContentType) -> DocumentService {
        service_with_trust(content_type, Ok(()))
    }

    fn service_with_trust(content_type: ContentType, trust: Result<(), TrustError>) -> DocumentService {
        DocumentService::new(
            content_type,
            Arc::new(DigestPrimitive),
            Arc::new(FixedTrust(trust)),
            EngineConfig::default(),
        )
    }

    fn b64(data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn reference(uri: &str, type_uri: Option<&str>, content: &[u8]) -> String {
        let type_attr = type_uri.map(|t| format!(r#" Type="{t}""#)).unwrap_or_default();
        let digest = vellum_crypto::digest::digest(algorithm::SHA256, content).unwrap();
        format!(
            r#"<ds:Reference URI="{uri}"{type_attr}><ds:DigestMethod Algorithm="{}"/><ds:DigestValue>{}</ds:DigestValue></ds:Reference>"#,
            algorithm::SHA256,
            b64(&digest)
        )
    }

    fn signature(id: &str, references: &str, objects: &str) -> String {
        format!(
            r#"<ds:Signature xmlns:ds="{DSIG}" Id="{id}"><ds:SignedInfo><ds:CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/><ds:SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"/>{references}</ds:SignedInfo><ds:SignatureValue>c2lnbmF0dXJl</ds:SignatureValue><ds:KeyInfo><ds:X509Data><ds:X509Certificate>{}</ds:X509Certificate></ds:X509Data></ds:KeyInfo>{objects}</ds:Signature>"#,
            b64(SIGNER_DER)
        )
    }

    /// Signature entry covering each of `entries` by name.
    fn zip_signature(entries: &[(&str, &[u8])]) -> String {
        let references: String = entries.iter().map(|(name, data)| reference(name, None, data)).collect();
        signature("sig-1", &references, "")
    }

    const FILES: [(&str, &[u8]); 3] = [("a.txt", b"alpha"), ("b.txt", b"beta"), ("docs/c.txt", b"gamma")];

    fn signed_zip(files: &[(&str, &[u8])], signature_xml: &str) -> Vec<u8> {
        let mut entries = files.to_vec();
        entries.push(("META-INF/signatures.xml", signature_xml.as_bytes()));
        build_zip(&entries)
    }

    #[test]
    fn test_zip_single_signature() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let signatures = service(ContentType::Zip).verify_signatures(&zip, None).unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].signer.der(), SIGNER_DER);
        assert_eq!(signatures[0].part, "META-INF/signatures.xml");
        assert_eq!(signatures[0].id.as_deref(), Some("sig-1"));
        assert_eq!(signatures[0].signing_time, None);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let service = service(ContentType::Zip);
        let first = service.verify_signatures(&zip, None).unwrap();
        let second = service.verify_signatures(&zip, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_altered_entry_drops_signature() {
        let altered = [FILES[0], ("b.txt", b"BETA".as_slice()), FILES[2]];
        let zip = signed_zip(&altered, &zip_signature(&FILES));
        let service = service(ContentType::Zip);
        assert!(service.verify_signatures(&zip, None).unwrap().is_empty());

        let report = service.verify_report(&zip, None).unwrap();
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(report.rejected[0].rejection, Rejection::CryptographicFailure(_)));
        assert!(!report.is_unsigned());
    }

    #[test]
    fn test_added_entry_is_unsigned_content() {
        let signature_xml = zip_signature(&FILES);
        let original = signed_zip(&FILES, &signature_xml);
        let mut grown = FILES.to_vec();
        grown.push(("d.txt", b"delta"));
        let document = signed_zip(&grown, &signature_xml);

        let err = service(ContentType::Zip)
            .verify_signatures(&document, Some(&original))
            .unwrap_err();
        assert!(matches!(err, Error::UnsignedContentDetected(ref names) if names.contains("d.txt")));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unsigned_manifest_does_not_cover_added_entry() {
        let injected = format!(
            r#"<ds:Object Id="injected"><ds:Manifest>{}</ds:Manifest></ds:Object>"#,
            reference("evil.txt", None, b"evil")
        );
        let references: String = FILES.iter().map(|(name, data)| reference(name, None, data)).collect();
        let signature_xml = signature("sig-1", &references, &injected);
        let mut grown = FILES.to_vec();
        grown.push(("evil.txt", b"evil"));
        let document = signed_zip(&grown, &signature_xml);

        let err = service(ContentType::Zip)
            .verify_signatures(&document, None)
            .unwrap_err();
        assert!(matches!(err, Error::UnsignedContentDetected(ref names) if names == "evil.txt"));
    }

    #[test]
    fn test_signed_manifest_covers_entry() {
        let manifest = format!(
            r#"<ds:Manifest>{}</ds:Manifest>"#,
            reference("docs/c.txt", None, b"gamma")
        );
        let object = format!(r#"<ds:Object Id="pkg">{manifest}</ds:Object>"#);
        let references = [
            reference("a.txt", None, b"alpha"),
            reference("b.txt", None, b"beta"),
            reference("#pkg", Some(algorithm::DSIG_OBJECT), object.as_bytes()),
        ]
        .concat();
        let zip = signed_zip(&FILES, &signature("sig-1", &references, &object));
        let original = build_zip(&FILES);

        let signatures = service(ContentType::Zip)
            .verify_signatures(&zip, Some(&original))
            .unwrap();
        assert_eq!(signatures.len(), 1);
    }

    #[test]
    fn test_signed_manifest_entry_checked_against_baseline() {
        let object = format!(
            r#"<ds:Object Id="pkg"><ds:Manifest>{}</ds:Manifest></ds:Object>"#,
            reference("docs/c.txt", None, b"gamma")
        );
        let references = [
            reference("a.txt", None, b"alpha"),
            reference("b.txt", None, b"beta"),
            reference("#pkg", Some(algorithm::DSIG_OBJECT), object.as_bytes()),
        ]
        .concat();
        let zip = signed_zip(&FILES, &signature("sig-1", &references, &object));
        let original = build_zip(&[("a.txt", b"alpha"), ("b.txt", b"beta"), ("docs/c.txt", b"original")]);

        let err = service(ContentType::Zip)
            .verify_signatures(&zip, Some(&original))
            .unwrap_err();
        assert!(matches!(err, Error::TamperedContent(ref msg) if msg.contains("docs/c.txt")));
    }

    #[test]
    fn test_baseline_accepts_unchanged_content() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let original = build_zip(&FILES);
        let signatures = service(ContentType::Zip)
            .verify_signatures(&zip, Some(&original))
            .unwrap();
        assert_eq!(signatures.len(), 1);
    }

    #[test]
    fn test_baseline_with_different_content_is_tampered() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let original = build_zip(&[("a.txt", b"original alpha"), FILES[1], FILES[2]]);
        let err = service(ContentType::Zip)
            .verify_signatures(&zip, Some(&original))
            .unwrap_err();
        assert!(matches!(err, Error::TamperedContent(_)));
    }

    #[test]
    fn test_baseline_entry_dropped_from_signature_is_tampered() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let mut original = FILES.to_vec();
        original.push(("removed.txt", b"gone"));
        let err = service(ContentType::Zip)
            .verify_signatures(&zip, Some(&build_zip(&original)))
            .unwrap_err();
        assert!(matches!(err, Error::TamperedContent(_)));
    }

    #[test]
    fn test_baseline_rejected_for_odf_and_xml() {
        for content_type in [ContentType::Odf, ContentType::Xml, ContentType::Ooxml] {
            let err = service(content_type)
                .verify_signatures(b"<doc/>", Some(b"<doc/>"))
                .unwrap_err();
            assert!(matches!(err, Error::UnsupportedBaseline(_)), "{content_type}");
        }
    }

    #[test]
    fn test_unsigned_zip() {
        let zip = build_zip(&FILES);
        let report = service(ContentType::Zip).verify_report(&zip, None).unwrap();
        assert!(report.is_unsigned());
    }

    #[test]
    fn test_malformed_container() {
        let err = service(ContentType::Zip)
            .verify_signatures(b"not a zip archive", None)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }

    #[test]
    fn test_one_bad_signature_does_not_affect_the_other() {
        let good = signature("good", &reference("a.txt", None, b"alpha"), "");
        let bad = signature("bad", &reference("a.txt", None, b"forged"), "");
        let wrapper = format!("<document-signatures>{good}{bad}</document-signatures>");
        let zip = signed_zip(&[("a.txt", b"alpha")], &wrapper);

        let report = service(ContentType::Zip).verify_report(&zip, None).unwrap();
        assert_eq!(report.signatures.len(), 1);
        assert_eq!(report.signatures[0].id.as_deref(), Some("good"));
        assert_eq!(report.signatures[0].index, 0);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id.as_deref(), Some("bad"));
        assert_eq!(report.rejected[0].index, 1);
    }

    #[test]
    fn test_trust_rejection() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let report = service_with_trust(ContentType::Zip, Err(TrustError::Revoked("serial 4660".into())))
            .verify_report(&zip, None)
            .unwrap();
        assert!(report.signatures.is_empty());
        assert!(matches!(report.rejected[0].rejection, Rejection::TrustRejected(_)));
    }

    #[test]
    fn test_xml_co_signature_with_properties() {
        let data = r#"<data Id="content">hello</data>"#;
        let signer_digest = vellum_crypto::digest::digest(algorithm::SHA256, SIGNER_DER).unwrap();
        let signed_properties = format!(
            r#"<xades:SignedProperties Id="xades-props"><xades:SignedSignatureProperties><xades:SigningTime>2026-10-19T14:53:30Z</xades:SigningTime><xades:SigningCertificate><xades:Cert><xades:CertDigest><ds:DigestMethod Algorithm="{}"/><ds:DigestValue>{}</ds:DigestValue></xades:CertDigest><xades:IssuerSerial><ds:X509IssuerName>CN=Vellum Test CA</ds:X509IssuerName><ds:X509SerialNumber>4660</ds:X509SerialNumber></xades:IssuerSerial></xades:Cert></xades:SigningCertificate><xades:SignerRole><xades:ClaimedRoles><xades:ClaimedRole>Director</xades:ClaimedRole></xades:ClaimedRoles></xades:SignerRole></xades:SignedSignatureProperties></xades:SignedProperties>"#,
            algorithm::SHA256,
            b64(&signer_digest)
        );
        let identity_object = r#"<ds:Object Id="identity"><identity:Identity xmlns:identity="be:fedict:eid:identity:1.0"><identity:Name>Signer</identity:Name><identity:FirstName>Alice</identity:FirstName><identity:Gender>FEMALE</identity:Gender></identity:Identity></ds:Object>"#;
        let references = [
            reference("#content", None, data.as_bytes()),
            reference("#xades-props", Some(algorithm::XADES_SIGNED_PROPERTIES), signed_properties.as_bytes()),
            reference("#identity", Some(algorithm::IDENTITY_REFERENCE), identity_object.as_bytes()),
        ]
        .concat();
        let objects = format!(
            r##"<ds:Object><xades:QualifyingProperties xmlns:xades="http://uri.etsi.org/01903/v1.3.2#" Target="#sig">{signed_properties}</xades:QualifyingProperties></ds:Object>{identity_object}"##
        );
        let document = format!("<doc>{data}{}</doc>", signature("sig", &references, &objects));

        let signatures = service(ContentType::Xml)
            .verify_signatures(document.as_bytes(), None)
            .unwrap();
        assert_eq!(signatures.len(), 1);
        let info = &signatures[0];
        assert_eq!(
            info.signing_time,
            Some("2026-10-19T14:53:30Z".parse::<DateTime<Utc>>().unwrap())
        );
        assert_eq!(info.role.as_deref(), Some("Director"));
        assert_eq!(info.part, "");
        let identity = info.identity.as_ref().unwrap();
        assert_eq!(identity.name.as_deref(), Some("Signer"));
        assert_eq!(identity.first_name.as_deref(), Some("Alice"));
        assert_eq!(identity.gender, Some(Gender::Female));
    }

    const XADES: &str = "http://uri.etsi.org/01903/v1.3.2#";

    fn signed_properties_xml(id_attr: &str, signing_time: &str, role: &str) -> String {
        format!(
            r#"<xades:SignedProperties{id_attr}><xades:SignedSignatureProperties><xades:SigningTime>{signing_time}</xades:SigningTime><xades:SignerRole><xades:ClaimedRoles><xades:ClaimedRole>{role}</xades:ClaimedRole></xades:ClaimedRoles></xades:SignerRole></xades:SignedSignatureProperties></xades:SignedProperties>"#
        )
    }

    /// A co-signed XML document whose signed properties claim the role Clerk.
    /// `leading_objects` go before the genuine properties object and
    /// `leading_properties` inside its QualifyingProperties, ahead of the
    /// signed SignedProperties element.
    fn clerk_document(leading_objects: &str, leading_properties: &str) -> String {
        let data = r#"<data Id="content">hello</data>"#;
        let signed_properties = signed_properties_xml(r#" Id="xades-props""#, "2026-10-19T14:53:30Z", "Clerk");
        let references = [
            reference("#content", None, data.as_bytes()),
            reference("#xades-props", Some(algorithm::XADES_SIGNED_PROPERTIES), signed_properties.as_bytes()),
        ]
        .concat();
        let objects = format!(
            r#"{leading_objects}<ds:Object><xades:QualifyingProperties xmlns:xades="{XADES}">{leading_properties}{signed_properties}</xades:QualifyingProperties></ds:Object>"#
        );
        format!("<doc>{data}{}</doc>", signature("sig", &references, &objects))
    }

    #[test]
    fn test_clerk_document_reports_signed_role() {
        let signatures = service(ContentType::Xml)
            .verify_signatures(clerk_document("", "").as_bytes(), None)
            .unwrap();
        assert_eq!(signatures[0].role.as_deref(), Some("Clerk"));
    }

    #[test]
    fn test_duplicate_signed_properties_id_rejects_signature() {
        let forged = format!(
            r#"<ds:Object><xades:QualifyingProperties xmlns:xades="{XADES}">{}</xades:QualifyingProperties></ds:Object>"#,
            signed_properties_xml(r#" Id="xades-props""#, "2001-01-01T00:00:00Z", "CEO")
        );
        let document = clerk_document(&forged, "");

        let report = service(ContentType::Xml).verify_report(document.as_bytes(), None).unwrap();
        assert!(report.signatures.is_empty());
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(
            report.rejected[0].rejection,
            Rejection::UnresolvableReference("#xades-props".into())
        );
    }

    #[test]
    fn test_unreferenced_signed_properties_are_not_reported() {
        let forged = signed_properties_xml("", "2001-01-01T00:00:00Z", "CEO");
        let document = clerk_document("", &forged);

        let signatures = service(ContentType::Xml)
            .verify_signatures(document.as_bytes(), None)
            .unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].role.as_deref(), Some("Clerk"));
        assert_eq!(
            signatures[0].signing_time,
            Some("2026-10-19T14:53:30Z".parse::<DateTime<Utc>>().unwrap())
        );
    }

    #[test]
    fn test_xml_signing_certificate_mismatch() {
        let data = r#"<data Id="content">hello</data>"#;
        let signed_properties = format!(
            r#"<xades:SignedProperties Id="xades-props"><xades:SignedSignatureProperties><xades:SigningCertificate><xades:Cert><xades:CertDigest><ds:DigestMethod Algorithm="{}"/><ds:DigestValue>{}</ds:DigestValue></xades:CertDigest></xades:Cert></xades:SigningCertificate></xades:SignedSignatureProperties></xades:SignedProperties>"#,
            algorithm::SHA256,
            b64(&[0u8; 32])
        );
        let references = [
            reference("#content", None, data.as_bytes()),
            reference("#xades-props", Some(algorithm::XADES_SIGNED_PROPERTIES), signed_properties.as_bytes()),
        ]
        .concat();
        let objects = format!(
            r#"<ds:Object><xades:QualifyingProperties xmlns:xades="http://uri.etsi.org/01903/v1.3.2#">{signed_properties}</xades:QualifyingProperties></ds:Object>"#
        );
        let document = format!("<doc>{data}{}</doc>", signature("sig", &references, &objects));

        let report = service(ContentType::Xml).verify_report(document.as_bytes(), None).unwrap();
        assert!(report.signatures.is_empty());
        assert!(matches!(report.rejected[0].rejection, Rejection::SigningCertificateMismatch(_)));
    }

    const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    const RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    fn rels(entries: &[(&str, &str, &str)]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in entries {
            xml.push_str(&format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn ooxml_package(extra: &[(&str, &[u8])]) -> Vec<u8> {
        let root_rels = rels(&[
            (
                "rId1",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
                "word/document.xml",
            ),
            ("rId2", algorithm::REL_DIGITAL_SIGNATURE_ORIGIN, "_xmlsignatures/origin.sigs"),
        ]);
        let origin_rels = rels(&[
            ("rId1", algorithm::REL_DIGITAL_SIGNATURE, "sig1.xml"),
            ("rId2", algorithm::REL_DIGITAL_SIGNATURE, "sig2.xml"),
        ]);
        let document_xml: &[u8] = b"<document>report</document>";
        let part_references = [
            reference(&format!("/_rels/.rels?ContentType={RELS}"), None, root_rels.as_bytes()),
            reference(&format!("/word/document.xml?ContentType={DOCX}"), None, document_xml),
        ]
        .concat();

        // The first signature references the parts directly, the second
        // through a package manifest.
        let first = signature("sig-1", &part_references, "");
        let manifest = format!(r#"<ds:Object Id="idPackageObject"><ds:Manifest>{part_references}</ds:Manifest></ds:Object>"#);
        let second = signature(
            "sig-2",
            &reference("#idPackageObject", Some(algorithm::DSIG_OBJECT), manifest.as_bytes()),
            &manifest,
        );

        let package: [(&str, &[u8]); 7] = [
            ("[Content_Types].xml", b"<Types/>"),
            ("_rels/.rels", root_rels.as_bytes()),
            ("word/document.xml", document_xml),
            ("_xmlsignatures/origin.sigs", b""),
            ("_xmlsignatures/_rels/origin.sigs.rels", origin_rels.as_bytes()),
            ("_xmlsignatures/sig1.xml", first.as_bytes()),
            ("_xmlsignatures/sig2.xml", second.as_bytes()),
        ];
        let mut entries = package.to_vec();
        entries.extend_from_slice(extra);
        build_zip(&entries)
    }

    #[test]
    fn test_ooxml_two_signatures_in_relationship_order() {
        let package = ooxml_package(&[]);
        let signatures = service(ContentType::Ooxml).verify_signatures(&package, None).unwrap();
        let parts: Vec<_> = signatures.iter().map(|s| s.part.as_str()).collect();
        assert_eq!(parts, vec!["_xmlsignatures/sig1.xml", "_xmlsignatures/sig2.xml"]);
        let ids: Vec<_> = signatures.iter().map(|s| s.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("sig-1"), Some("sig-2")]);
    }

    #[test]
    fn test_ooxml_unsigned_part() {
        let package = ooxml_package(&[("word/media/image1.png", b"png")]);
        let err = service(ContentType::Ooxml).verify_signatures(&package, None).unwrap_err();
        assert!(matches!(err, Error::UnsignedContentDetected(ref names) if names.contains("word/media/image1.png")));
    }

    fn odf_package(files: &[(&str, &[u8])]) -> Vec<u8> {
        let manifest: &[u8] = b"<manifest:manifest/>";
        let content: &[u8] = b"<office:document-content/>";
        let references = [
            reference("content.xml", None, content),
            reference("META-INF/manifest.xml", None, manifest),
        ]
        .concat();
        let signature_xml = format!(
            r#"<document-signatures xmlns="urn:oasis:names:tc:opendocument:xmlns:digitalsignature:1.0">{}</document-signatures>"#,
            signature("odf-sig", &references, "")
        );
        let package: [(&str, &[u8]); 4] = [
            ("mimetype", b"application/vnd.oasis.opendocument.text"),
            ("content.xml", content),
            ("META-INF/manifest.xml", manifest),
            ("META-INF/documentsignatures.xml", signature_xml.as_bytes()),
        ];
        let mut entries = package.to_vec();
        entries.extend_from_slice(files);
        build_zip(&entries)
    }

    #[test]
    fn test_odf_signature() {
        let signatures = service(ContentType::Odf)
            .verify_signatures(&odf_package(&[]), None)
            .unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].part, "META-INF/documentsignatures.xml");
    }

    #[test]
    fn test_odf_unsigned_entry() {
        let err = service(ContentType::Odf)
            .verify_signatures(&odf_package(&[("styles.xml", b"<styles/>")]), None)
            .unwrap_err();
        assert!(matches!(err, Error::UnsignedContentDetected(_)));
    }

    #[test]
    fn test_asic_reserved_entries_need_no_reference() {
        let data: [(&str, &[u8]); 1] = [("data.txt", b"payload")];
        let signature_xml = zip_signature(&data);
        let entries: [(&str, &[u8]); 4] = [
            ("mimetype", b"application/vnd.etsi.asic-e+zip"),
            ("META-INF/manifest.xml", b"<manifest/>"),
            ("data.txt", b"payload"),
            ("META-INF/signatures.xml", signature_xml.as_bytes()),
        ];
        let zip = build_zip(&entries);
        let signatures = service(ContentType::Asic).verify_signatures(&zip, None).unwrap();
        assert_eq!(signatures.len(), 1);
    }

    #[test]
    fn test_visualize_xml_is_identity() {
        let xml = b"<doc><data>hello</data></doc>";
        let visualization = service(ContentType::Xml).visualize_document(xml).unwrap();
        assert_eq!(visualization.mime_type, "text/xml");
        assert_eq!(visualization.data, xml);
    }

    #[test]
    fn test_visualize_zip_lists_signed_entries() {
        let files: [(&str, &[u8]); 2] = [("a<b>.txt", b"x"), ("plain.txt", b"y")];
        let zip = signed_zip(&files, "<document-signatures/>");
        let visualization = service(ContentType::Zip).visualize_document(&zip).unwrap();
        assert_eq!(visualization.mime_type, "text/html");
        let html = String::from_utf8(visualization.data).unwrap();
        assert!(html.contains("<p>a&lt;b&gt;.txt</p>"));
        assert!(html.contains("<p>plain.txt</p>"));
        assert!(!html.contains("signatures.xml"));
    }

    #[test]
    fn test_find_document() {
        let zip = signed_zip(&FILES, &zip_signature(&FILES));
        let zip_service = service(ContentType::Zip);
        assert_eq!(zip_service.find_document(&zip, "docs/c.txt").unwrap(), Some(b"gamma".to_vec()));
        assert_eq!(zip_service.find_document(&zip, "missing.txt").unwrap(), None);

        let xml = b"<doc/>";
        assert_eq!(
            service(ContentType::Xml).find_document(xml, "ignored").unwrap(),
            Some(xml.to_vec())
        );
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentService>();
    }
}
