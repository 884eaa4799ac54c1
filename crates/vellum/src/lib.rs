#![forbid(unsafe_code)]

//! Vellum: signature verification for signed XML documents and ZIP-based
//! packages (OpenDocument, Office Open XML, ASiC and generic ZIP).
//!
//! A [`FormatRegistry`] maps MIME types to [`DocumentService`]s. Each
//! service locates the signatures of a document, validates them through an
//! injected [`SignaturePrimitive`], checks that they cover the whole
//! package, extracts XAdES and eID metadata and hands the signer's chain to
//! an injected [`TrustContext`].

pub use vellum_container as container;
pub use vellum_core as core;
pub use vellum_crypto as crypto;
pub use vellum_dsig as dsig;
pub use vellum_trust as trust;
pub use vellum_xades as xades;
pub use vellum_xml as xml;

pub mod config;
pub mod inspect;
pub mod registry;
pub mod service;
pub mod visualize;

pub use config::EngineConfig;
pub use inspect::{inspect, InspectionReport, SignatureSummary};
pub use registry::{content_type_for, FormatRegistry, FORMATS};
pub use service::{DocumentService, RejectedSignature, SignatureInfo, VerificationReport};
pub use visualize::Visualization;
pub use vellum_core::{ContentType, Error, Rejection};
pub use vellum_dsig::{SignaturePrimitive, ValidationContext, VerifyResult};
pub use vellum_trust::{TrustContext, TrustError, TrustPolicy};
