#![forbid(unsafe_code)]

//! Signature metadata: XAdES signing time, signer role, signing-certificate
//! binding, time-stamp tokens and embedded validation data, plus the eID
//! identity facet.

pub mod identity;
pub mod properties;

pub use identity::{Gender, Identity, Photo};
pub use properties::{CertReference, QualifyingProperties, TimeStamp, TimeStampKind};
