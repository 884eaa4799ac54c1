#![forbid(unsafe_code)]

//! The closed set of document formats the engine understands.

use std::fmt;

/// Container format of a signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// A single XML document carrying its own co-signatures.
    Xml,
    /// OpenDocument package (`META-INF/documentsignatures.xml`).
    Odf,
    /// Office Open XML package (signature parts found through relationships).
    Ooxml,
    /// Generic ZIP archive with a `META-INF/*signatures*` entry.
    Zip,
    /// Associated Signature Container (ETSI ASiC).
    Asic,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Xml,
        ContentType::Odf,
        ContentType::Ooxml,
        ContentType::Zip,
        ContentType::Asic,
    ];

    /// Whether the document is a ZIP archive of named entries.
    pub fn is_archive(self) -> bool {
        !matches!(self, ContentType::Xml)
    }

    /// Whether an original document may be supplied for tamper diffing.
    pub fn supports_baseline(self) -> bool {
        matches!(self, ContentType::Zip | ContentType::Asic)
    }

    /// Whether every to-be-signed entry must be covered by a reference.
    pub fn requires_coverage(self) -> bool {
        self.is_archive()
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentType::Xml => "plain-xml",
            ContentType::Odf => "odf-zip",
            ContentType::Ooxml => "ooxml-zip",
            ContentType::Zip => "generic-zip",
            ContentType::Asic => "asic-zip",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_support() {
        let supported: Vec<_> = ContentType::ALL
            .iter()
            .filter(|ct| ct.supports_baseline())
            .collect();
        assert_eq!(supported, vec![&ContentType::Zip, &ContentType::Asic]);
    }

    #[test]
    fn test_archive_flag() {
        assert!(!ContentType::Xml.is_archive());
        assert!(ContentType::Odf.is_archive());
        assert!(ContentType::Ooxml.requires_coverage());
        assert_eq!(ContentType::Asic.to_string(), "asic-zip");
    }
}
