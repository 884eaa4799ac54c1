#![forbid(unsafe_code)]

//! Signer certificate selection from `ds:KeyInfo`.

use crate::signature::EmbeddedSignature;
use tracing::debug;
use vellum_core::Rejection;
use vellum_crypto::Certificate;

/// The signer certificate and the KeyInfo certificates ordered as a chain.
#[derive(Debug, Clone)]
pub struct SelectedKey {
    pub signer: Certificate,
    /// Starts with the signer, then each issuer found among the KeyInfo
    /// certificates, then any unrelated certificates in document order.
    pub chain: Vec<Certificate>,
}

/// Selects the signing certificate from `KeyInfo/X509Data`.
///
/// The first `X509Certificate` is the signer. Signatures without one cannot
/// be attributed and are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyInfoKeySelector;

impl KeyInfoKeySelector {
    pub fn select(&self, signature: &EmbeddedSignature) -> Result<SelectedKey, Rejection> {
        let certs = signature
            .key_info_certificates
            .iter()
            .map(|der| Certificate::from_der(der))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Rejection::CryptographicFailure(format!("KeyInfo certificate: {e}")))?;

        let mut certs = certs.into_iter();
        let signer = certs.next().ok_or(Rejection::MissingSignerCertificate)?;
        let chain = order_chain(signer.clone(), certs.collect());
        debug!(
            signer = %signer.subject(),
            chain_len = chain.len(),
            "selected signer certificate"
        );
        Ok(SelectedKey { signer, chain })
    }
}

/// Walk issuer links from `leaf` through `rest`.
///
/// Self-issued certificates end the walk. Certificates not reached keep
/// their relative order at the end.
fn order_chain(leaf: Certificate, mut rest: Vec<Certificate>) -> Vec<Certificate> {
    let mut chain = vec![leaf];
    loop {
        let Some(current) = chain.last() else { break };
        if current.is_issued_by(current) {
            break;
        }
        let Some(pos) = rest.iter().position(|c| current.is_issued_by(c)) else {
            break;
        };
        chain.push(rest.remove(pos));
    }
    chain.extend(rest);
    chain
}
