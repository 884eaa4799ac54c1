#![forbid(unsafe_code)]

//! Format-specific view over the raw bytes of a signed document.

use std::borrow::Cow;
use std::io::{Cursor, Read};
use tracing::debug;
use vellum_core::{ContentType, Error};

/// One named entry of a container.
#[derive(Debug, Clone)]
pub struct ContainerEntry<'a> {
    name: String,
    data: Cow<'a, [u8]>,
    directory: bool,
}

impl<'a> ContainerEntry<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dir(&self) -> bool {
        self.directory
    }
}

/// A signed document opened for verification.
///
/// Plain XML documents are a single unnamed entry borrowing the whole
/// buffer. ZIP-family documents are decoded into their entries in stored
/// order; signature locators depend on that order.
#[derive(Debug)]
pub struct Container<'a> {
    content_type: ContentType,
    source: &'a [u8],
    entries: Vec<ContainerEntry<'a>>,
}

impl<'a> Container<'a> {
    /// Open `source` as a container of the given type.
    ///
    /// Undecodable archives fail with [`Error::MalformedContainer`].
    pub fn open(source: &'a [u8], content_type: ContentType) -> Result<Self, Error> {
        let entries = if content_type.is_archive() {
            read_archive(source)?
        } else {
            vec![ContainerEntry {
                name: String::new(),
                data: Cow::Borrowed(source),
                directory: false,
            }]
        };
        debug!(%content_type, entries = entries.len(), "opened container");
        Ok(Self {
            content_type,
            source,
            entries,
        })
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn is_archive(&self) -> bool {
        self.content_type.is_archive()
    }

    /// The raw document bytes.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// All entries, directories included, in stored order.
    pub fn entries(&self) -> &[ContainerEntry<'a>] {
        &self.entries
    }

    /// File entries (no directories) in stored order.
    pub fn files(&self) -> impl Iterator<Item = &ContainerEntry<'a>> {
        self.entries.iter().filter(|e| !e.directory)
    }

    /// The first file entry with exactly this name.
    pub fn entry(&self, name: &str) -> Option<&ContainerEntry<'a>> {
        self.files().find(|e| e.name == name)
    }
}

fn read_archive(source: &[u8]) -> Result<Vec<ContainerEntry<'static>>, Error> {
    let mut archive = zip::ZipArchive::new(Cursor::new(source))
        .map_err(|e| Error::MalformedContainer(format!("ZIP: {e}")))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| Error::MalformedContainer(format!("ZIP entry #{index}: {e}")))?;
        let name = file.name().to_owned();
        let directory = file.is_dir();
        let mut data = Vec::new();
        if !directory {
            file.read_to_end(&mut data)
                .map_err(|e| Error::MalformedContainer(format!("ZIP entry {name}: {e}")))?;
        }
        entries.push(ContainerEntry {
            name,
            data: Cow::Owned(data),
            directory,
        });
    }
    Ok(entries)
}
