#![forbid(unsafe_code)]

//! Embedded revocation evidence: X.509 CRLs and OCSP responses.
//!
//! The engine never decides revocation status itself. It decodes just enough
//! to know *when* each piece of evidence was issued, which bounds the grace
//! period policy, and hands the DER on to the trust context.

use crate::time::{parse_generalized_time, to_utc};
use chrono::{DateTime, Utc};
use der::asn1::{Any, ObjectIdentifier, OctetString};
use der::{Decode, Reader, SliceReader, Tag, Tagged};
use vellum_core::Error;

const ID_PKIX_OCSP_BASIC: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.48.1.1");

// ── CRL ──────────────────────────────────────────────────────────────

/// A certificate revocation list.
#[derive(Clone)]
pub struct Crl {
    der: Vec<u8>,
    parsed: x509_cert::crl::CertificateList,
    this_update: DateTime<Utc>,
}

impl Crl {
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let parsed = x509_cert::crl::CertificateList::from_der(der)
            .map_err(|e| Error::Revocation(format!("CRL decode: {e}")))?;
        let this_update = to_utc(parsed.tbs_cert_list.this_update.to_date_time())?;
        Ok(Self {
            der: der.to_vec(),
            parsed,
            this_update,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn issuer(&self) -> String {
        self.parsed.tbs_cert_list.issuer.to_string()
    }

    pub fn this_update(&self) -> DateTime<Utc> {
        self.this_update
    }

    pub fn next_update(&self) -> Option<DateTime<Utc>> {
        self.parsed
            .tbs_cert_list
            .next_update
            .as_ref()
            .and_then(|t| to_utc(t.to_date_time()).ok())
    }

    pub fn inner(&self) -> &x509_cert::crl::CertificateList {
        &self.parsed
    }
}

impl std::fmt::Debug for Crl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crl")
            .field("issuer", &self.issuer())
            .field("this_update", &self.this_update)
            .finish()
    }
}

// ── OCSP ─────────────────────────────────────────────────────────────

/// `OCSPResponseStatus` values (RFC 6960 §4.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcspStatus {
    Successful,
    MalformedRequest,
    InternalError,
    TryLater,
    SigRequired,
    Unauthorized,
    Unknown(u8),
}

impl From<u8> for OcspStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Successful,
            1 => Self::MalformedRequest,
            2 => Self::InternalError,
            3 => Self::TryLater,
            5 => Self::SigRequired,
            6 => Self::Unauthorized,
            other => Self::Unknown(other),
        }
    }
}

/// An OCSP response.
///
/// ```text
/// OCSPResponse ::= SEQUENCE {
///    responseStatus  OCSPResponseStatus,
///    responseBytes   [0] EXPLICIT ResponseBytes OPTIONAL }
/// ResponseBytes ::= SEQUENCE {
///    responseType    OBJECT IDENTIFIER,
///    response        OCTET STRING }
/// ```
#[derive(Debug, Clone)]
pub struct OcspResponse {
    der: Vec<u8>,
    status: OcspStatus,
    produced_at: Option<DateTime<Utc>>,
}

impl OcspResponse {
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let mut reader = SliceReader::new(der).map_err(ocsp_err)?;
        let (status, response_bytes) = reader
            .sequence(|r| {
                let status = Any::decode(r)?;
                let response_bytes = if r.is_finished() {
                    None
                } else {
                    Some(Any::decode(r)?)
                };
                Ok((status, response_bytes))
            })
            .map_err(ocsp_err)?;

        if status.tag() != Tag::Enumerated || status.value().len() != 1 {
            return Err(Error::Revocation("invalid OCSP response status".into()));
        }
        let status = OcspStatus::from(status.value()[0]);

        let produced_at = match response_bytes {
            Some(explicit) if status == OcspStatus::Successful => {
                Some(basic_response_produced_at(explicit.value())?)
            }
            _ => None,
        };

        Ok(Self {
            der: der.to_vec(),
            status,
            produced_at,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn status(&self) -> OcspStatus {
        self.status
    }

    /// `producedAt` of the basic response; `None` for unsuccessful responses.
    pub fn produced_at(&self) -> Option<DateTime<Utc>> {
        self.produced_at
    }
}

/// Extract `producedAt` from the encoded `ResponseBytes`.
fn basic_response_produced_at(response_bytes: &[u8]) -> Result<DateTime<Utc>, Error> {
    let mut reader = SliceReader::new(response_bytes).map_err(ocsp_err)?;
    let (response_type, response) = reader
        .sequence(|r| {
            let oid = ObjectIdentifier::decode(r)?;
            let response = OctetString::decode(r)?;
            Ok((oid, response))
        })
        .map_err(ocsp_err)?;
    if response_type != ID_PKIX_OCSP_BASIC {
        return Err(Error::Revocation(format!(
            "unsupported OCSP response type {response_type}"
        )));
    }

    // BasicOCSPResponse ::= SEQUENCE { tbsResponseData ResponseData, ... }
    let mut reader = SliceReader::new(response.as_bytes()).map_err(ocsp_err)?;
    let tbs_response_data = reader
        .sequence(|r| {
            let tbs = Any::decode(r)?;
            while !r.is_finished() {
                Any::decode(r)?;
            }
            Ok(tbs)
        })
        .map_err(ocsp_err)?;

    // ResponseData ::= SEQUENCE { version [0] OPTIONAL, responderID, producedAt, ... }
    let mut reader = SliceReader::new(tbs_response_data.value()).map_err(ocsp_err)?;
    while !reader.is_finished() {
        let field = Any::decode(&mut reader).map_err(ocsp_err)?;
        if field.tag() == Tag::GeneralizedTime {
            return parse_generalized_time(field.value());
        }
    }
    Err(Error::Revocation("OCSP response without producedAt".into()))
}

fn ocsp_err(e: der::Error) -> Error {
    Error::Revocation(format!("OCSP decode: {e}"))
}

/// Revocation evidence embedded in a signature, in document order.
#[derive(Debug, Clone, Default)]
pub struct RevocationValues {
    pub crls: Vec<Crl>,
    pub ocsp_responses: Vec<OcspResponse>,
}

impl RevocationValues {
    pub fn is_empty(&self) -> bool {
        self.crls.is_empty() && self.ocsp_responses.is_empty()
    }

    /// Issue times of all evidence: CRL `thisUpdate` and OCSP `producedAt`.
    pub fn issue_times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.crls
            .iter()
            .map(Crl::this_update)
            .chain(self.ocsp_responses.iter().filter_map(OcspResponse::produced_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CRL: &[u8] = include_bytes!("../../../testdata/ca.crl.der");
    const OCSP: &[u8] = include_bytes!("../../../testdata/ocsp.der");

    #[test]
    fn test_crl() {
        let crl = Crl::from_der(CRL).unwrap();
        assert_eq!(crl.issuer(), "CN=Vellum Test CA");
        assert_eq!(
            crl.this_update(),
            Utc.with_ymd_and_hms(2026, 10, 19, 14, 53, 35).unwrap()
        );
        assert_eq!(
            crl.next_update(),
            Some(Utc.with_ymd_and_hms(2026, 11, 18, 14, 53, 35).unwrap())
        );
    }

    #[test]
    fn test_ocsp_produced_at() {
        let ocsp = OcspResponse::from_der(OCSP).unwrap();
        assert_eq!(ocsp.status(), OcspStatus::Successful);
        assert_eq!(
            ocsp.produced_at(),
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 14, 53, 35).unwrap())
        );
    }

    #[test]
    fn test_ocsp_unsuccessful() {
        // OCSPResponse { responseStatus tryLater }
        let ocsp = OcspResponse::from_der(&[0x30, 0x03, 0x0a, 0x01, 0x03]).unwrap();
        assert_eq!(ocsp.status(), OcspStatus::TryLater);
        assert_eq!(ocsp.produced_at(), None);
    }

    #[test]
    fn test_garbage() {
        assert!(matches!(Crl::from_der(b"junk"), Err(Error::Revocation(_))));
        assert!(matches!(OcspResponse::from_der(CRL), Err(Error::Revocation(_))));
    }

    #[test]
    fn test_issue_times() {
        let values = RevocationValues {
            crls: vec![Crl::from_der(CRL).unwrap()],
            ocsp_responses: vec![OcspResponse::from_der(OCSP).unwrap()],
        };
        assert!(!values.is_empty());
        assert_eq!(values.issue_times().count(), 2);
    }
}
