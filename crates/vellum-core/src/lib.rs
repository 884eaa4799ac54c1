#![forbid(unsafe_code)]

//! Core types shared by all Vellum crates: errors, content types,
//! namespace and algorithm constants.

pub mod algorithm;
pub mod content_type;
pub mod error;
pub mod ns;

pub use content_type::ContentType;
pub use error::{Error, Rejection, Result};
