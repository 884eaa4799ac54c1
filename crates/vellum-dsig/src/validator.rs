#![forbid(unsafe_code)]

//! Per-signature cryptographic validation.

use crate::keyselector::{KeyInfoKeySelector, SelectedKey};
use crate::primitive::{SignaturePrimitive, ValidationContext, VerifyResult};
use crate::signature::EmbeddedSignature;
use std::sync::Arc;
use tracing::{debug, warn};
use vellum_container::UriDereferencer;
use vellum_core::Rejection;
use vellum_crypto::Certificate;
use vellum_xml::XmlDocument;

/// A signature whose value and references verified.
#[derive(Debug, Clone)]
pub struct ValidatedSignature {
    pub signer: Certificate,
    /// KeyInfo certificates ordered from the signer upwards.
    pub key_info_chain: Vec<Certificate>,
}

/// Runs key selection and the injected primitive for one signature.
#[derive(Clone)]
pub struct SignatureValidator {
    primitive: Arc<dyn SignaturePrimitive>,
    key_selector: KeyInfoKeySelector,
}

impl SignatureValidator {
    pub fn new(primitive: Arc<dyn SignaturePrimitive>) -> Self {
        Self {
            primitive,
            key_selector: KeyInfoKeySelector,
        }
    }

    pub fn validate(
        &self,
        document: &XmlDocument,
        signature: &EmbeddedSignature,
        dereferencer: &dyn UriDereferencer,
    ) -> Result<ValidatedSignature, Rejection> {
        let SelectedKey { signer, chain } = self.key_selector.select(signature)?;

        for reference in signature.all_references() {
            if let Err(e) = dereferencer.dereference(&reference.uri) {
                warn!(signature = %signature.label(), uri = %reference.uri, "reference does not resolve");
                return Err(e.into());
            }
        }

        let ctx = ValidationContext {
            document,
            signature,
            signer: &signer,
            dereferencer,
        };
        match self.primitive.validate(&ctx) {
            Ok(VerifyResult::Valid) => {
                debug!(signature = %signature.label(), "signature value verified");
                Ok(ValidatedSignature {
                    signer,
                    key_info_chain: chain,
                })
            }
            Ok(VerifyResult::Invalid { reason }) => {
                warn!(signature = %signature.label(), %reason, "signature invalid");
                Err(Rejection::CryptographicFailure(reason))
            }
            Err(e) => {
                warn!(signature = %signature.label(), error = %e, "signature validation error");
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureValidator").finish_non_exhaustive()
    }
}
