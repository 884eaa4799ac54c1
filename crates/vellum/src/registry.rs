#![forbid(unsafe_code)]

//! MIME type to document service mapping.

use crate::config::EngineConfig;
use crate::service::{DocumentService, SignatureInfo};
use std::sync::Arc;
use vellum_core::{ContentType, Error};
use vellum_dsig::SignaturePrimitive;
use vellum_trust::TrustContext;

/// Supported MIME types.
pub const FORMATS: &[(&str, ContentType)] = &[
    ("text/xml", ContentType::Xml),
    ("application/xml", ContentType::Xml),
    ("application/vnd.oasis.opendocument.text", ContentType::Odf),
    ("application/vnd.oasis.opendocument.spreadsheet", ContentType::Odf),
    ("application/vnd.oasis.opendocument.presentation", ContentType::Odf),
    ("application/vnd.oasis.opendocument.graphics", ContentType::Odf),
    ("application/vnd.oasis.opendocument.chart", ContentType::Odf),
    ("application/vnd.oasis.opendocument.formula", ContentType::Odf),
    ("application/vnd.oasis.opendocument.database", ContentType::Odf),
    ("application/vnd.openxmlformats-officedocument.wordprocessingml.document", ContentType::Ooxml),
    ("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", ContentType::Ooxml),
    ("application/vnd.openxmlformats-officedocument.presentationml.presentation", ContentType::Ooxml),
    ("application/zip", ContentType::Zip),
    ("application/vnd.etsi.asic-e+zip", ContentType::Asic),
    ("application/vnd.etsi.asic-s+zip", ContentType::Asic),
];

/// Map a MIME type to its content type. Parameters such as `charset` are
/// ignored and the comparison is case-insensitive.
pub fn content_type_for(mime_type: &str) -> Result<ContentType, Error> {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    FORMATS
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, content_type)| *content_type)
        .ok_or_else(|| Error::UnsupportedContentType(mime_type.to_owned()))
}

/// One document service per content type, sharing collaborators.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    services: Vec<DocumentService>,
}

impl FormatRegistry {
    pub fn new(
        primitive: Arc<dyn SignaturePrimitive>,
        trust: Arc<dyn TrustContext>,
        config: EngineConfig,
    ) -> Self {
        let services = ContentType::ALL
            .iter()
            .map(|ct| DocumentService::new(*ct, primitive.clone(), trust.clone(), config))
            .collect();
        Self { services }
    }

    pub fn service(&self, mime_type: &str) -> Result<&DocumentService, Error> {
        let content_type = content_type_for(mime_type)?;
        self.services
            .iter()
            .find(|s| s.content_type() == content_type)
            .ok_or_else(|| Error::UnsupportedContentType(mime_type.to_owned()))
    }

    /// Verify `document` with the service registered for `mime_type`.
    pub fn verify(
        &self,
        document: &[u8],
        mime_type: &str,
        original: Option<&[u8]>,
    ) -> Result<Vec<SignatureInfo>, Error> {
        self.service(mime_type)?.verify_signatures(document, original)
    }
}
