//! Pack rendered brand documents into a single ZIP archive.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::models::{BrandGroups, UNKNOWN_BRAND};
use crate::render::{Document, Renderer, DOCUMENT_EXTENSION};

/// Media type of the archive returned to clients
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";

/// Suggested download name of the archive
pub const ARCHIVE_FILE_NAME: &str = "encar_pdfs.zip";

/// Keep letters, digits, spaces, underscores and hyphens, then trim.
/// An empty result becomes [`UNKNOWN_BRAND`].
pub fn sanitize_brand(brand: &str) -> String {
    let kept: String = brand
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    match kept.trim() {
        "" => UNKNOWN_BRAND.to_string(),
        name => name.to_string(),
    }
}

/// Hands out unique entry names: `Kia.pdf`, `Kia-2.pdf`, `Kia-3.pdf`...
///
/// Names are compared case-insensitively so the archive also extracts
/// cleanly on case-insensitive filesystems.
#[derive(Debug, Default)]
pub struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    pub fn claim(&mut self, stem: &str) -> String {
        let mut name = format!("{}.{}", stem, DOCUMENT_EXTENSION);
        let mut suffix = 2;
        while !self.used.insert(name.to_lowercase()) {
            name = format!("{}-{}.{}", stem, suffix, DOCUMENT_EXTENSION);
            suffix += 1;
        }
        name
    }
}

/// Write documents as deflated entries, in the order given
pub fn write_archive(documents: &[Document]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut names = EntryNames::default();

    for document in documents {
        let name = names.claim(&sanitize_brand(&document.brand));
        debug!(
            "Adding {} ({} page(s), {} bytes)",
            name,
            document.page_count,
            document.bytes.len()
        );
        writer.start_file(name, options)?;
        writer.write_all(&document.bytes)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Render every brand group and pack the results into one archive
pub async fn assemble(groups: &BrandGroups, renderer: &Renderer) -> Result<Vec<u8>> {
    let mut documents = Vec::with_capacity(groups.len());
    for (brand, listings) in groups.iter() {
        documents.push(renderer.render(brand, listings).await?);
    }

    let bytes = write_archive(&documents)?;
    info!("Packed {} document(s) into {} bytes", documents.len(), bytes.len());
    Ok(bytes)
}
