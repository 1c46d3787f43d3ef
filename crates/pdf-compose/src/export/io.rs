//! Document I/O for export

use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// A source PDF opened for the duration of one export
pub(crate) struct LoadedSource {
    pub document: Document,
    pub page_ids: Vec<ObjectId>,
    /// Source object id -> output object id, shared by every page copied
    /// out of this document
    pub cache: HashMap<ObjectId, ObjectId>,
}

impl LoadedSource {
    pub fn open(path: &Path) -> Result<Self> {
        let document = Document::load(path).map_err(|e| ComposeError::source_open(path, e))?;
        let page_ids = document.get_pages().values().copied().collect();
        Ok(Self {
            document,
            page_ids,
            cache: HashMap::new(),
        })
    }

    pub fn page_id(&self, path: &Path, page_index: usize) -> Result<ObjectId> {
        self.page_ids.get(page_index).copied().ok_or_else(|| {
            ComposeError::source_open(
                path,
                format!(
                    "page {} not found (document has {} pages)",
                    page_index + 1,
                    self.page_ids.len()
                ),
            )
        })
    }
}

/// Mode for the written file: the target's own when it already exists,
/// otherwise what a plain create would give. Temp files start out
/// owner-only.
fn output_permissions(path: &Path) -> Result<Option<std::fs::Permissions>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}

/// Save `doc` to `path` without ever leaving a half-written file there:
/// the bytes go to a uniquely named temp file next to the target, which
/// is renamed over it once complete.
pub(crate) fn write_pdf_atomic(doc: &mut Document, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".pdft-")
        .suffix(".pdf.tmp")
        .tempfile_in(dir)?;
    doc.save_to(&mut temp)?;
    temp.flush()?;
    if let Some(permissions) = output_permissions(path)? {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| ComposeError::Io(e.error))?;
    Ok(())
}
