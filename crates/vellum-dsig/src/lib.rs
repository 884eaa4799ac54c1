#![forbid(unsafe_code)]

//! XML Digital Signature (XML-DSig) handling for signed containers.
//!
//! Parses `ds:Signature` elements, selects the signer certificate, runs the
//! injected signature primitive and enforces the coverage invariant.

pub mod coverage;
pub mod keyselector;
pub mod primitive;
pub mod signature;
pub mod validator;

pub use coverage::{check_baseline, check_coverage, ReferenceUriSet};
pub use keyselector::{KeyInfoKeySelector, SelectedKey};
pub use primitive::{SignaturePrimitive, ValidationContext, VerifyResult};
pub use signature::{parse_all, EmbeddedSignature, Reference};
pub use validator::{SignatureValidator, ValidatedSignature};
