#![forbid(unsafe_code)]

//! XML document abstraction for the Vellum engine.
//!
//! Provides an owned document over `roxmltree`, element navigation helpers
//! and same-document URI resolution.

pub mod document;
pub mod node;
pub mod xpath;

pub use document::XmlDocument;

/// Return roxmltree parsing options for untrusted input.
///
/// Signed documents arrive from arbitrary callers, so DTDs are refused.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: false,
        ..roxmltree::ParsingOptions::default()
    }
}
