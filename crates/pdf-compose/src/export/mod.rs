//! PDF export - turning a composition into a single output document
//!
//! 1. Open each distinct source PDF once
//! 2. Copy every page in composition order, adding its rotation
//! 3. Wrap image pages in in-memory one-page PDFs and copy those
//! 4. Write the result atomically
//!
//! Any failure aborts the whole export and leaves the destination alone.

mod copy;
mod image_page;
mod io;

pub use image_page::image_document;

use crate::composition::{PageDescriptor, PageSource};
use crate::rotation::{Rotation, rotate_image};
use crate::settings::ComposeSettings;
use crate::types::*;
use copy::copy_page;
use io::{LoadedSource, write_pdf_atomic};
use lopdf::{Dictionary, Document, Object};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// Export `pages` to `path` on a blocking task
pub async fn export(
    pages: Vec<PageDescriptor>,
    path: impl AsRef<Path>,
    settings: &ComposeSettings,
) -> Result<ExportSummary> {
    let path = path.as_ref().to_owned();
    let settings = settings.clone();

    tokio::task::spawn_blocking(move || export_sync(&pages, &path, &settings))
        .await
        .map_err(|e| ComposeError::export(e.into()))?
}

/// Export `pages` to `path` on the calling thread
pub fn export_sync(
    pages: &[PageDescriptor],
    path: &Path,
    settings: &ComposeSettings,
) -> Result<ExportSummary> {
    if pages.is_empty() {
        return Err(ComposeError::NoPages);
    }

    let mut doc = assemble(pages, settings).map_err(ComposeError::export)?;
    write_pdf_atomic(&mut doc, path).map_err(ComposeError::export)?;

    log::info!("Exported {} pages to {}", pages.len(), path.display());
    Ok(ExportSummary {
        path: path.to_path_buf(),
        page_count: pages.len(),
    })
}

/// Build the output document in memory
pub fn assemble(pages: &[PageDescriptor], settings: &ComposeSettings) -> Result<Document> {
    if pages.is_empty() {
        return Err(ComposeError::NoPages);
    }

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let mut sources: HashMap<PathBuf, LoadedSource> = HashMap::new();
    let mut kids = Vec::with_capacity(pages.len());

    for (i, page) in pages.iter().enumerate() {
        log::debug!("Exporting page {} ({})", i + 1, page.label());

        let page_id = match page.source() {
            PageSource::Image { image } => {
                let rotated = rotate_image(image, page.rotation());
                let single = image_document(&rotated, settings.image_dpi)?;
                let source_page = *single
                    .get_pages()
                    .values()
                    .next()
                    .ok_or(ComposeError::NoPages)?;
                let mut cache = HashMap::new();
                copy_page(
                    &mut output,
                    &single,
                    source_page,
                    pages_id,
                    Rotation::None,
                    &mut cache,
                )?
            }
            PageSource::PdfPage { page_index } => {
                let path = page.source_path();
                let source = match sources.entry(path.to_path_buf()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(LoadedSource::open(path)?),
                };
                let source_page = source.page_id(path, *page_index)?;
                copy_page(
                    &mut output,
                    &source.document,
                    source_page,
                    pages_id,
                    page.rotation(),
                    &mut source.cache,
                )?
            }
        };

        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    output.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    output.trailer.set("Root", catalog_id);
    output.compress();

    Ok(output)
}
