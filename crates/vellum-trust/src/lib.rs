#![forbid(unsafe_code)]

//! Trust delegation.
//!
//! A cryptographically valid signature is only accepted once its signing
//! certificate, chain and time-stamps have been bound to the signature and
//! accepted by an external [`TrustContext`].

pub mod context;
pub mod delegate;
pub mod policy;

pub use context::{TrustContext, TrustError};
pub use delegate::{TrustDelegate, TrustOutcome};
pub use policy::TrustPolicy;
