//! Editing session: the composition plus everything a front end shows
//! about it, with one method per user action.
//!
//! Mutating methods return `true` when the preview has to be rebuilt.
//! Actions on the selected page do nothing without a selection, the
//! same way the buttons do nothing when no row is highlighted.

use crate::composition::{Composition, PageId};
use crate::page_list::PageList;
use crate::rotation::Rotation;
use crate::settings::ComposeSettings;
use crate::types::*;
use crate::view::ViewState;
use std::path::{Path, PathBuf};

/// Result of adding a batch of files
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<PageId>,
    pub failed: Vec<(PathBuf, ComposeError)>,
}

#[derive(Debug, Default)]
pub struct Session {
    composition: Composition,
    list: PageList,
    view: ViewState,
    settings: ComposeSettings,
    selected: Option<usize>,
}

impl Session {
    pub fn new(settings: ComposeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn page_list(&self) -> &PageList {
        &self.list
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn settings(&self) -> &ComposeSettings {
        &self.settings
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.composition.len());
    }

    /// Select a page by id, as shown in a preview that may be older than
    /// the current order. Unknown ids clear the selection.
    pub fn select_page(&mut self, id: PageId) {
        self.selected = self.composition.position(id);
    }

    fn after_edit(&mut self) {
        self.list.sync(&self.composition);
        if let Some(i) = self.selected {
            if self.composition.is_empty() {
                self.selected = None;
            } else if i >= self.composition.len() {
                self.selected = Some(self.composition.len() - 1);
            }
        }
    }

    /// Add PDFs and images. Files that fail to open are reported and
    /// skipped; the rest are still added. Switches the preview to auto-fit.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> AddReport {
        let mut report = AddReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.composition.add_path(path) {
                Ok(ids) => report.added.extend(ids),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    report.failed.push((path.to_path_buf(), e));
                }
            }
        }
        self.view.fit();
        self.after_edit();
        report
    }

    pub fn rotate_selected(&mut self, delta_degrees: i32) -> Result<Option<Rotation>> {
        let Some(i) = self.selected else {
            return Ok(None);
        };
        let rotation = self.composition.rotate(i, delta_degrees)?;
        self.after_edit();
        Ok(Some(rotation))
    }

    /// Duplicate the selected page and select the copy
    pub fn duplicate_selected(&mut self) -> Result<Option<PageId>> {
        let Some(i) = self.selected else {
            return Ok(None);
        };
        let id = self.composition.duplicate(i)?;
        self.selected = Some(i + 1);
        self.after_edit();
        Ok(Some(id))
    }

    pub fn delete_selected(&mut self) -> Result<bool> {
        let Some(i) = self.selected else {
            return Ok(false);
        };
        self.composition.delete(i)?;
        self.after_edit();
        Ok(true)
    }

    /// A row was dragged from `from` to `to` in the page list. The
    /// selection follows the moved row.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<bool> {
        if from == to {
            return Ok(false);
        }
        let selected_id = self
            .selected
            .and_then(|i| self.composition.get(i))
            .map(|p| p.id());

        self.list.move_row(from, to)?;
        self.list.reconcile(&mut self.composition)?;
        self.selected = selected_id.and_then(|id| self.composition.position(id));
        self.after_edit();
        Ok(true)
    }

    /// Apply a complete visual order, as a list widget reports it
    pub fn reorder(&mut self, new_order: &[PageId]) -> Result<bool> {
        let selected_id = self
            .selected
            .and_then(|i| self.composition.get(i))
            .map(|p| p.id());
        self.composition.reorder(new_order)?;
        self.selected = selected_id.and_then(|id| self.composition.position(id));
        self.after_edit();
        Ok(true)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.view.zoom_in(&self.settings);
        true
    }

    pub fn zoom_out(&mut self) -> bool {
        self.view.zoom_out(&self.settings);
        true
    }

    pub fn fit(&mut self) -> bool {
        self.view.fit();
        true
    }

    pub fn clear_all(&mut self) -> bool {
        self.composition.clear();
        self.selected = None;
        self.after_edit();
        true
    }

    /// Index-based editing for scripted front ends
    pub fn composition_mut(&mut self) -> SessionEdit<'_> {
        SessionEdit { session: self }
    }
}

/// Mutable access to the composition that re-syncs the page list when
/// dropped
pub struct SessionEdit<'a> {
    session: &'a mut Session,
}

impl std::ops::Deref for SessionEdit<'_> {
    type Target = Composition;

    fn deref(&self) -> &Composition {
        &self.session.composition
    }
}

impl std::ops::DerefMut for SessionEdit<'_> {
    fn deref_mut(&mut self) -> &mut Composition {
        &mut self.session.composition
    }
}

impl Drop for SessionEdit<'_> {
    fn drop(&mut self) {
        self.session.after_edit();
    }
}
