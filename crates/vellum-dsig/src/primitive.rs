#![forbid(unsafe_code)]

//! Seam to the low-level XML signature primitive.
//!
//! Canonicalization, transform pipelines and raw signature verification are
//! supplied by the embedding application through [`SignaturePrimitive`].

use crate::signature::EmbeddedSignature;
use vellum_container::UriDereferencer;
use vellum_core::Error;
use vellum_crypto::Certificate;
use vellum_xml::XmlDocument;

/// Result of a cryptographic signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// Signature is valid.
    Valid,
    /// Signature is invalid.
    Invalid { reason: String },
}

/// Everything the primitive needs for one signature.
pub struct ValidationContext<'a> {
    /// Document holding the `ds:Signature` element.
    pub document: &'a XmlDocument,
    pub signature: &'a EmbeddedSignature,
    /// Certificate whose public key must verify `SignatureValue`.
    pub signer: &'a Certificate,
    /// Resolves every reference URI of the signature.
    pub dereferencer: &'a dyn UriDereferencer,
}

impl<'a> ValidationContext<'a> {
    /// Source text of the `ds:Signature` element.
    pub fn signature_xml(&self) -> Option<&'a [u8]> {
        self.document.slice(self.signature.range.clone())
    }
}

/// Recomputes reference digests and checks the signature value.
///
/// The references to check are [`EmbeddedSignature::all_references`]: those
/// of SignedInfo and of the manifests SignedInfo signs.
///
/// Implementations must resolve references only through
/// [`ValidationContext::dereferencer`] so that container naming rules apply.
/// Returning [`Error::UnresolvableReference`] marks the signature as
/// unresolvable; any other error or [`VerifyResult::Invalid`] marks it as a
/// cryptographic failure.
pub trait SignaturePrimitive: Send + Sync {
    fn validate(&self, ctx: &ValidationContext<'_>) -> Result<VerifyResult, Error>;
}
