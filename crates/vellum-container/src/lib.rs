#![forbid(unsafe_code)]

//! Container model for signed documents: entry enumeration, signature
//! location and reference URI dereferencing for plain XML, ODF, OOXML,
//! generic ZIP and ASiC documents.

pub mod container;
pub mod dereference;
pub mod locator;
pub mod naming;
pub mod ooxml;

pub use container::{Container, ContainerEntry};
pub use dereference::{ContainerDereferencer, Dereferenced, UriDereferencer};
pub use locator::{locate, SignaturePart};
