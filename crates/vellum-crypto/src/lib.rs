#![forbid(unsafe_code)]

//! Cryptographic parsing for the Vellum engine.
//!
//! Digests for references and certificate bindings, X.509 certificates,
//! RFC 3161 time-stamp tokens and embedded revocation evidence. Signature
//! value verification is not done here; it belongs to the injected
//! signature primitive.

pub mod cert;
pub mod digest;
pub mod revocation;
pub mod time;
pub mod timestamp;

pub use cert::Certificate;
pub use digest::DigestMethod;
pub use revocation::{Crl, OcspResponse, OcspStatus, RevocationValues};
pub use timestamp::TimeStampToken;
