//! The ordered list of pages that make up the output document

use crate::rotation::Rotation;
use crate::types::*;
use image::RgbImage;
use lopdf::Document;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stable handle to one descriptor. Ids are never reused within a
/// composition, so a duplicated page gets its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a page's content comes from
#[derive(Debug, Clone)]
pub enum PageSource {
    /// A page of a PDF on disk, 0-based
    PdfPage { page_index: usize },
    /// A decoded image, shared between duplicates
    Image { image: Arc<RgbImage> },
}

impl PartialEq for PageSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::PdfPage { page_index: a }, Self::PdfPage { page_index: b }) => a == b,
            (Self::Image { image: a }, Self::Image { image: b }) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// One page of the output document
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    id: PageId,
    source_path: PathBuf,
    source: PageSource,
    rotation: Rotation,
}

impl PageDescriptor {
    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn source(&self) -> &PageSource {
        &self.source
    }

    pub fn source_kind(&self) -> SourceKind {
        match self.source {
            PageSource::PdfPage { .. } => SourceKind::PdfPage,
            PageSource::Image { .. } => SourceKind::Image,
        }
    }

    pub fn page_index(&self) -> Option<usize> {
        match self.source {
            PageSource::PdfPage { page_index } => Some(page_index),
            PageSource::Image { .. } => None,
        }
    }

    pub fn cached_image(&self) -> Option<&Arc<RgbImage>> {
        match &self.source {
            PageSource::Image { image } => Some(image),
            PageSource::PdfPage { .. } => None,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// True when both descriptors draw the same content, regardless of
    /// identity and rotation
    pub fn same_source(&self, other: &PageDescriptor) -> bool {
        self.source_path == other.source_path && self.source == other.source
    }

    /// Text shown for this page in the page list
    pub fn label(&self) -> String {
        let name = self
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string());

        match self.source {
            PageSource::PdfPage { page_index } => format!("{name} — page {}", page_index + 1),
            PageSource::Image { .. } => name,
        }
    }
}

/// Ordered page descriptors; the order is the output page order
#[derive(Debug, Clone, Default)]
pub struct Composition {
    pages: Vec<PageDescriptor>,
    next_id: u64,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> PageId {
        let id = PageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, source_path: &Path, source: PageSource) -> PageId {
        let id = self.allocate_id();
        self.pages.push(PageDescriptor {
            id,
            source_path: source_path.to_path_buf(),
            source,
            rotation: Rotation::None,
        });
        id
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(ComposeError::InvalidIndex {
                index,
                len: self.pages.len(),
            })
        }
    }

    /// Append one descriptor per page of the PDF at `path`
    pub fn add_pdf(&mut self, path: impl AsRef<Path>) -> Result<Vec<PageId>> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|e| ComposeError::source_open(path, e))?;
        let page_count = doc.get_pages().len();
        log::debug!("Adding {} pages from {}", page_count, path.display());

        Ok(self.add_pdf_pages(path, page_count))
    }

    /// Append descriptors for a PDF whose page count is already known
    pub fn add_pdf_pages(&mut self, path: impl AsRef<Path>, page_count: usize) -> Vec<PageId> {
        let path = path.as_ref();
        (0..page_count)
            .map(|page_index| self.push(path, PageSource::PdfPage { page_index }))
            .collect()
    }

    /// Decode the image at `path` and append it as a single page
    pub fn add_image(&mut self, path: impl AsRef<Path>) -> Result<PageId> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| ComposeError::source_open(path, e))?
            .into_rgb8();
        log::debug!(
            "Adding image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(self.add_decoded_image(path, image))
    }

    /// Append an image that has already been decoded
    pub fn add_decoded_image(&mut self, path: impl AsRef<Path>, image: RgbImage) -> PageId {
        self.push(
            path.as_ref(),
            PageSource::Image {
                image: Arc::new(image),
            },
        )
    }

    /// Add a PDF or an image depending on the file extension
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<Vec<PageId>> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => self.add_pdf(path),
            Some("png" | "jpg" | "jpeg") => Ok(vec![self.add_image(path)?]),
            _ => Err(ComposeError::UnsupportedFile(path.to_path_buf())),
        }
    }

    /// Insert a copy of the page at `index` right after it
    pub fn duplicate(&mut self, index: usize) -> Result<PageId> {
        self.check_index(index)?;
        let id = self.allocate_id();
        let copy = PageDescriptor {
            id,
            ..self.pages[index].clone()
        };
        self.pages.insert(index + 1, copy);
        Ok(id)
    }

    pub fn delete(&mut self, index: usize) -> Result<PageDescriptor> {
        self.check_index(index)?;
        Ok(self.pages.remove(index))
    }

    /// Add `delta_degrees` (clockwise, multiple of 90) to the page's rotation
    pub fn rotate(&mut self, index: usize, delta_degrees: i32) -> Result<Rotation> {
        self.check_index(index)?;
        let page = &mut self.pages[index];
        page.rotation = page.rotation.rotated_by(delta_degrees)?;
        Ok(page.rotation)
    }

    /// Rearrange pages so they follow `new_order`, which must list every
    /// current id exactly once
    pub fn reorder(&mut self, new_order: &[PageId]) -> Result<()> {
        if new_order.len() != self.pages.len() {
            return Err(ComposeError::InvalidPermutation(format!(
                "expected {} pages, got {}",
                self.pages.len(),
                new_order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        let mut positions = Vec::with_capacity(new_order.len());
        for id in new_order {
            if !seen.insert(*id) {
                return Err(ComposeError::InvalidPermutation(format!(
                    "page {id} listed twice"
                )));
            }
            let position = self.position(*id).ok_or_else(|| {
                ComposeError::InvalidPermutation(format!("unknown page {id}"))
            })?;
            positions.push(position);
        }

        self.apply_positions(&positions);
        Ok(())
    }

    /// Rearrange pages by position: `new_order[i]` is the current position
    /// of the page that should end up at `i`
    pub fn reorder_indices(&mut self, new_order: &[usize]) -> Result<()> {
        let len = self.pages.len();
        if new_order.len() != len {
            return Err(ComposeError::InvalidPermutation(format!(
                "expected {len} positions, got {}",
                new_order.len()
            )));
        }

        let mut seen = vec![false; len];
        for &position in new_order {
            if position >= len {
                return Err(ComposeError::InvalidPermutation(format!(
                    "position {position} out of range"
                )));
            }
            if std::mem::replace(&mut seen[position], true) {
                return Err(ComposeError::InvalidPermutation(format!(
                    "position {position} listed twice"
                )));
            }
        }

        self.apply_positions(new_order);
        Ok(())
    }

    fn apply_positions(&mut self, positions: &[usize]) {
        let mut old: Vec<Option<PageDescriptor>> = self.pages.drain(..).map(Some).collect();
        self.pages = positions
            .iter()
            .filter_map(|&position| old[position].take())
            .collect();
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter()
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn ids(&self) -> Vec<PageId> {
        self.pages.iter().map(PageDescriptor::id).collect()
    }

    pub fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Owned copy of the pages for the render and export pipelines
    pub fn snapshot(&self) -> Vec<PageDescriptor> {
        self.pages.clone()
    }
}
