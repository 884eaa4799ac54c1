#![forbid(unsafe_code)]

//! Human-readable renderings of signed documents.

use vellum_container::Container;
use vellum_core::ContentType;
use vellum_dsig::coverage::to_be_signed;

/// A rendering ready to be shown to the person checking the signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visualization {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Render a document: plain XML as itself, archives as an HTML listing of
/// the entries subject to signing.
pub fn render(container: &Container<'_>) -> Visualization {
    if container.is_archive() {
        entry_listing(container)
    } else {
        Visualization {
            mime_type: "text/xml",
            data: container.source().to_vec(),
        }
    }
}

fn entry_listing(container: &Container<'_>) -> Visualization {
    let mut html = String::from("<html><body>");
    html.push_str(&format!("<h1>{}</h1>", heading(container.content_type())));
    for name in to_be_signed(container) {
        html.push_str("<p>");
        html.push_str(&escape_html(name));
        html.push_str("</p>");
    }
    html.push_str("</body></html>");
    Visualization {
        mime_type: "text/html",
        data: html.into_bytes(),
    }
}

fn heading(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Xml => "XML document",
        ContentType::Odf => "OpenDocument package",
        ContentType::Ooxml => "Office Open XML package",
        ContentType::Zip => "ZIP package",
        ContentType::Asic => "Associated signature container",
    }
}

/// Escape text for HTML element content.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
