#![forbid(unsafe_code)]

//! The external trust authority.

use chrono::{DateTime, Utc};
use vellum_crypto::{Certificate, Crl, OcspResponse, TimeStampToken};

/// Why the trust authority refused a chain or token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustError {
    #[error("not trusted: {0}")]
    Untrusted(String),

    #[error("revoked: {0}")]
    Revoked(String),

    #[error("expired: {0}")]
    Expired(String),

    #[error("trust service unavailable: {0}")]
    Unavailable(String),
}

/// PKI validation performed outside the engine.
///
/// Path building, revocation fetching and time-stamp authority checks all
/// live behind this trait. The engine only hands over what the signature
/// carries.
pub trait TrustContext: Send + Sync {
    /// Validate `chain` (signer first) at time `at`, using the embedded
    /// revocation evidence where possible.
    fn validate_chain(
        &self,
        chain: &[Certificate],
        at: DateTime<Utc>,
        ocsp_responses: &[OcspResponse],
        crls: &[Crl],
    ) -> Result<(), TrustError>;

    /// Validate a time-stamp token and its TSA with the embedded TSA
    /// revocation evidence.
    fn validate_timestamp_token(
        &self,
        token: &TimeStampToken,
        ocsp_responses: &[OcspResponse],
        crls: &[Crl],
    ) -> Result<(), TrustError>;
}
