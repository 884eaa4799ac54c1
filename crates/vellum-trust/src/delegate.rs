#![forbid(unsafe_code)]

//! Binds signature metadata to the signer and consults the trust context.

use crate::context::TrustContext;
use crate::policy::TrustPolicy;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use vellum_core::Rejection;
use vellum_crypto::cert::normalize_decimal;
use vellum_crypto::{Certificate, DigestMethod};
use vellum_xades::{QualifyingProperties, TimeStampKind};

/// What the trust delegate settled on for an accepted signature.
#[derive(Debug, Clone)]
pub struct TrustOutcome {
    /// The chain handed to the trust context, signer first.
    pub chain: Vec<Certificate>,
    /// The instant the chain was validated at.
    pub validation_time: DateTime<Utc>,
}

/// Applies the trust policy and forwards chains and time-stamp tokens to the
/// trust context.
#[derive(Clone)]
pub struct TrustDelegate {
    context: Arc<dyn TrustContext>,
    policy: TrustPolicy,
}

impl TrustDelegate {
    pub fn new(context: Arc<dyn TrustContext>, policy: TrustPolicy) -> Self {
        Self { context, policy }
    }

    /// Decide whether a cryptographically valid signature is trusted.
    pub fn evaluate(
        &self,
        signer: &Certificate,
        properties: &QualifyingProperties,
        key_info_chain: &[Certificate],
    ) -> Result<TrustOutcome, Rejection> {
        self.evaluate_at(signer, properties, key_info_chain, Utc::now())
    }

    /// [`evaluate`](Self::evaluate) with an explicit fallback for "now".
    pub fn evaluate_at(
        &self,
        signer: &Certificate,
        properties: &QualifyingProperties,
        key_info_chain: &[Certificate],
        now: DateTime<Utc>,
    ) -> Result<TrustOutcome, Rejection> {
        check_signing_certificate(signer, properties)?;

        let chain = select_chain(signer, properties, key_info_chain)?;

        self.check_timestamps(properties)?;

        let validation_time = self.validation_time(properties, now);
        self.check_revocation_freshness(properties, validation_time)?;

        let revocation = &properties.revocation_values;
        self.context
            .validate_chain(&chain, validation_time, &revocation.ocsp_responses, &revocation.crls)
            .map_err(|e| {
                warn!(signer = %signer.subject(), error = %e, "certificate chain rejected");
                Rejection::TrustRejected(e.to_string())
            })?;

        debug!(signer = %signer.subject(), %validation_time, "signature trusted");
        Ok(TrustOutcome {
            chain,
            validation_time,
        })
    }

    fn check_timestamps(&self, properties: &QualifyingProperties) -> Result<(), Rejection> {
        let max = self.policy.timestamp_max_offset();
        for timestamp in &properties.timestamps {
            let evidence = &timestamp.validation_revocation;
            self.context
                .validate_timestamp_token(&timestamp.token, &evidence.ocsp_responses, &evidence.crls)
                .map_err(|e| {
                    warn!(kind = ?timestamp.kind, error = %e, "time-stamp token rejected");
                    Rejection::TimestampRejected(e.to_string())
                })?;

            if timestamp.kind != TimeStampKind::Signature {
                continue;
            }
            let Some(signing_time) = properties.signing_time else {
                continue;
            };
            let delta = timestamp.token.gen_time() - signing_time;
            let offset = if delta < Duration::zero() { -delta } else { delta };
            if offset >= max {
                warn!(
                    gen_time = %timestamp.token.gen_time(),
                    %signing_time,
                    "time-stamp too far from signing time"
                );
                return Err(Rejection::TimestampOutOfRange {
                    offset_millis: offset.num_milliseconds(),
                    max_millis: max.num_milliseconds(),
                });
            }
        }
        Ok(())
    }

    fn validation_time(&self, properties: &QualifyingProperties, now: DateTime<Utc>) -> DateTime<Utc> {
        let timestamp_time = properties.earliest_signature_timestamp();
        let chosen = match (properties.signing_time, timestamp_time) {
            (_, Some(ts)) if self.policy.prefer_timestamp_time => ts,
            (Some(signing_time), _) => signing_time,
            (None, Some(ts)) => ts,
            (None, None) => now,
        };
        debug!(validation_time = %chosen, "selected validation time");
        chosen
    }

    fn check_revocation_freshness(
        &self,
        properties: &QualifyingProperties,
        validation_time: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        let Some(deadline) = validation_time.checked_add_signed(self.policy.max_grace_period()) else {
            return Ok(());
        };
        if let Some(latest) = properties.revocation_values.issue_times().max() {
            if latest > deadline {
                warn!(%latest, %deadline, "revocation evidence produced after grace period");
                return Err(Rejection::RevocationEvidenceTooLate {
                    late_millis: (latest - deadline).num_milliseconds(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TrustDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustDelegate")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// The first `SigningCertificate/Cert` must describe the signer.
fn check_signing_certificate(signer: &Certificate, properties: &QualifyingProperties) -> Result<(), Rejection> {
    let Some(cert_ref) = properties.signing_certificates.first() else {
        return Ok(());
    };

    let method = DigestMethod::from_uri(&cert_ref.digest_method)
        .map_err(|e| Rejection::SigningCertificateMismatch(e.to_string()))?;
    if signer.digest(method) != cert_ref.digest_value {
        return Err(Rejection::SigningCertificateMismatch("certificate digest differs".into()));
    }

    if let Some(serial) = &cert_ref.serial_number {
        if normalize_decimal(serial) != signer.serial_number() {
            return Err(Rejection::SigningCertificateMismatch(format!(
                "serial number {serial} differs from {}",
                signer.serial_number()
            )));
        }
    }
    Ok(())
}

/// CertificateValues, else the KeyInfo chain, else the signer alone.
fn select_chain(
    signer: &Certificate,
    properties: &QualifyingProperties,
    key_info_chain: &[Certificate],
) -> Result<Vec<Certificate>, Rejection> {
    let chain = if !properties.certificate_values.is_empty() {
        properties.certificate_values.clone()
    } else if !key_info_chain.is_empty() {
        key_info_chain.to_vec()
    } else {
        vec![signer.clone()]
    };
    if chain.first() != Some(signer) {
        warn!(signer = %signer.subject(), "chain does not start with the signer");
        return Err(Rejection::ChainMismatch);
    }
    Ok(chain)
}
