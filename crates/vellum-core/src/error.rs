#![forbid(unsafe_code)]

/// Errors produced by the Vellum signature verification engine.
///
/// The first group aborts a whole verification call. Everything else is
/// raised by individual stages and is either mapped to a [`Rejection`] of a
/// single signature or absorbed as missing metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Fatal, call-aborting ─────────────────────────────────────────
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("original document verification not supported for {0}")]
    UnsupportedBaseline(String),

    #[error("unsigned content detected: {0}")]
    UnsignedContentDetected(String),

    #[error("tampered content: {0}")]
    TamperedContent(String),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    // ── Stage errors ─────────────────────────────────────────────────
    #[error("unresolvable reference: {0}")]
    UnresolvableReference(String),

    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("timestamp token error: {0}")]
    Timestamp(String),

    #[error("revocation data error: {0}")]
    Revocation(String),

    #[error("invalid date-time value: {0}")]
    DateTime(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error must abort the whole verification call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MalformedContainer(_)
                | Error::UnsupportedBaseline(_)
                | Error::UnsignedContentDetected(_)
                | Error::TamperedContent(_)
                | Error::UnsupportedContentType(_)
        )
    }
}

/// Why a single signature was dropped from the result.
///
/// Rejections never stop processing of the other signatures in the same
/// container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cryptographic validation failed: {0}")]
    CryptographicFailure(String),

    #[error("unresolvable reference: {0}")]
    UnresolvableReference(String),

    #[error("no signer certificate in KeyInfo")]
    MissingSignerCertificate,

    #[error("XAdES signing certificate does not match the signer: {0}")]
    SigningCertificateMismatch(String),

    #[error("certificate chain does not start with the signer")]
    ChainMismatch,

    #[error("timestamp token rejected: {0}")]
    TimestampRejected(String),

    #[error("timestamp too far from signing time: offset {offset_millis} ms exceeds {max_millis} ms")]
    TimestampOutOfRange { offset_millis: i64, max_millis: i64 },

    #[error("revocation evidence produced {late_millis} ms after the grace period")]
    RevocationEvidenceTooLate { late_millis: i64 },

    #[error("trust validation failed: {0}")]
    TrustRejected(String),
}

impl From<Error> for Rejection {
    /// Map a stage error raised while validating one signature.
    fn from(err: Error) -> Self {
        match err {
            Error::UnresolvableReference(uri) => Rejection::UnresolvableReference(uri),
            other => Rejection::CryptographicFailure(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
