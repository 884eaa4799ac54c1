#![forbid(unsafe_code)]

//! X.509 certificates carried inside signatures.

use crate::digest::DigestMethod;
use crate::time::to_utc;
use base64::Engine;
use chrono::{DateTime, Utc};
use der::{Decode, Encode};
use vellum_core::Error;

/// A parsed X.509 certificate together with its original DER encoding.
///
/// Equality is byte equality of the DER encoding.
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    parsed: x509_cert::Certificate,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let parsed = x509_cert::Certificate::from_der(der)
            .map_err(|e| Error::Certificate(format!("DER decode: {e}")))?;
        Ok(Self {
            der: der.to_vec(),
            parsed,
        })
    }

    /// Parse base64 DER as found in `X509Certificate` and
    /// `EncapsulatedX509Certificate` elements.
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let der = base64::engine::general_purpose::STANDARD
            .decode(clean)
            .map_err(|e| Error::Base64(format!("certificate: {e}")))?;
        Self::from_der(&der)
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn inner(&self) -> &x509_cert::Certificate {
        &self.parsed
    }

    /// Subject distinguished name in RFC 4514 form.
    pub fn subject(&self) -> String {
        self.parsed.tbs_certificate.subject.to_string()
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer(&self) -> String {
        self.parsed.tbs_certificate.issuer.to_string()
    }

    /// Serial number as an unsigned decimal string, the form used by
    /// `X509SerialNumber`.
    pub fn serial_number(&self) -> String {
        format_serial_decimal(self.parsed.tbs_certificate.serial_number.as_bytes())
    }

    pub fn not_before(&self) -> Result<DateTime<Utc>, Error> {
        to_utc(self.parsed.tbs_certificate.validity.not_before.to_date_time())
    }

    pub fn not_after(&self) -> Result<DateTime<Utc>, Error> {
        to_utc(self.parsed.tbs_certificate.validity.not_after.to_date_time())
    }

    /// Digest of the DER encoding (XAdES `CertDigest`).
    pub fn digest(&self, method: DigestMethod) -> Vec<u8> {
        method.digest(&self.der)
    }

    /// Whether this certificate's issuer name equals `other`'s subject name.
    pub fn is_issued_by(&self, other: &Certificate) -> bool {
        match (
            self.parsed.tbs_certificate.issuer.to_der(),
            other.parsed.tbs_certificate.subject.to_der(),
        ) {
            (Ok(issuer), Ok(subject)) => issuer == subject,
            _ => false,
        }
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject())
            .field("issuer", &self.issuer())
            .field("serial", &self.serial_number())
            .finish()
    }
}

/// Convert a big-endian unsigned integer to its decimal representation.
///
/// A leading `0x00` sign byte of the ASN.1 INTEGER is harmless here.
pub fn format_serial_decimal(bytes: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::new(); // little-endian decimal digits
    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let val = (*digit as u32) * 256 + carry;
            *digit = (val % 10) as u8;
            carry = val / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    if digits.is_empty() {
        return "0".to_owned();
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

/// Normalise a decimal serial number from XML text for comparison.
pub fn normalize_decimal(text: &str) -> String {
    let trimmed = text.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}
