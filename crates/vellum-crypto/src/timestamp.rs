#![forbid(unsafe_code)]

//! RFC 3161 time-stamp tokens.
//!
//! A token is a CMS `ContentInfo` wrapping `SignedData` whose encapsulated
//! content is a DER `TSTInfo`:
//!
//! ```text
//! TSTInfo ::= SEQUENCE {
//!    version         INTEGER,
//!    policy          TSAPolicyId,
//!    messageImprint  MessageImprint,
//!    serialNumber    INTEGER,
//!    genTime         GeneralizedTime,
//!    ... }
//! ```
//!
//! Only the fields the engine needs are decoded; the token signature itself
//! is checked by the trust context.

use crate::cert::{format_serial_decimal, Certificate};
use crate::digest::DigestMethod;
use crate::time::parse_generalized_time;
use chrono::{DateTime, Utc};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::SignedData;
use der::asn1::{Any, ObjectIdentifier, OctetString, Uint};
use der::{Decode, Encode, Reader, SliceReader, Tag, Tagged};
use vellum_core::Error;
use x509_cert::spki::AlgorithmIdentifierOwned;

const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
const ID_CT_TST_INFO: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.16.1.4");

/// A decoded time-stamp token.
#[derive(Clone)]
pub struct TimeStampToken {
    der: Vec<u8>,
    gen_time: DateTime<Utc>,
    policy: ObjectIdentifier,
    imprint_algorithm: ObjectIdentifier,
    imprint: Vec<u8>,
    serial_number: String,
    certificates: Vec<Certificate>,
}

impl TimeStampToken {
    pub fn from_der(der: &[u8]) -> Result<Self, Error> {
        let content_info = ContentInfo::from_der(der).map_err(tst_err)?;
        if content_info.content_type != ID_SIGNED_DATA {
            return Err(Error::Timestamp(format!(
                "unexpected content type {}",
                content_info.content_type
            )));
        }
        let signed_data: SignedData = content_info.content.decode_as().map_err(tst_err)?;

        let encap = &signed_data.encap_content_info;
        if encap.econtent_type != ID_CT_TST_INFO {
            return Err(Error::Timestamp(format!(
                "encapsulated content is not TSTInfo: {}",
                encap.econtent_type
            )));
        }
        let econtent = encap
            .econtent
            .as_ref()
            .ok_or_else(|| Error::Timestamp("detached TSTInfo".into()))?;
        let tst_info: OctetString = econtent.decode_as().map_err(tst_err)?;
        let info = TstInfo::decode(tst_info.as_bytes())?;

        let mut certificates = Vec::new();
        if let Some(set) = &signed_data.certificates {
            for choice in set.0.iter() {
                if let CertificateChoices::Certificate(cert) = choice {
                    let cert_der = cert.to_der().map_err(tst_err)?;
                    certificates.push(Certificate::from_der(&cert_der)?);
                }
            }
        }

        Ok(Self {
            der: der.to_vec(),
            gen_time: info.gen_time,
            policy: info.policy,
            imprint_algorithm: info.imprint_algorithm,
            imprint: info.imprint,
            serial_number: info.serial_number,
            certificates,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Time at which the authority produced the token.
    pub fn gen_time(&self) -> DateTime<Utc> {
        self.gen_time
    }

    pub fn imprint(&self) -> &[u8] {
        &self.imprint
    }

    /// Serial number as an unsigned decimal string.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Certificates embedded in the token's `SignedData`, usually the TSA chain.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Whether the message imprint is the digest of `data`.
    pub fn imprint_matches(&self, data: &[u8]) -> Result<bool, Error> {
        let method = DigestMethod::from_oid(&self.imprint_algorithm)?;
        Ok(method.digest(data) == self.imprint)
    }
}

impl std::fmt::Debug for TimeStampToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeStampToken")
            .field("gen_time", &self.gen_time)
            .field("policy", &self.policy.to_string())
            .field("serial_number", &self.serial_number)
            .finish()
    }
}

struct TstInfo {
    policy: ObjectIdentifier,
    imprint_algorithm: ObjectIdentifier,
    imprint: Vec<u8>,
    serial_number: String,
    gen_time: DateTime<Utc>,
}

impl TstInfo {
    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = SliceReader::new(bytes).map_err(tst_err)?;
        let (policy, imprint_algorithm, imprint, serial, gen_time) = reader
            .sequence(|r| {
                let _version = Uint::decode(r)?;
                let policy = ObjectIdentifier::decode(r)?;
                let (algorithm, imprint) = r.sequence(|r| {
                    let algorithm = AlgorithmIdentifierOwned::decode(r)?;
                    let imprint = OctetString::decode(r)?;
                    Ok((algorithm.oid, imprint.into_bytes()))
                })?;
                let serial = Uint::decode(r)?;
                let gen_time = Any::decode(r)?;
                // accuracy, ordering, nonce, tsa, extensions
                while !r.is_finished() {
                    Any::decode(r)?;
                }
                Ok((policy, algorithm, imprint, serial, gen_time))
            })
            .map_err(tst_err)?;

        if gen_time.tag() != Tag::GeneralizedTime {
            return Err(Error::Timestamp(format!(
                "genTime has tag {}",
                gen_time.tag()
            )));
        }

        Ok(Self {
            policy,
            imprint_algorithm,
            imprint,
            serial_number: format_serial_decimal(serial.as_bytes()),
            gen_time: parse_generalized_time(gen_time.value())?,
        })
    }
}

fn tst_err(e: der::Error) -> Error {
    Error::Timestamp(e.to_string())
}
