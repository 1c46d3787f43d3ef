//! Keeps the user-facing page list in step with a [`Composition`]
//!
//! Rows carry the [`PageId`] of the descriptor they show. Labels are only
//! for display: two rows may read "scan.png" and still map back to the
//! right descriptor after a drag.

use crate::composition::{Composition, PageDescriptor, PageId};
use crate::types::{ComposeError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: PageId,
    pub label: String,
}

/// Visible, reorderable list of page labels
#[derive(Debug, Clone, Default)]
pub struct PageList {
    rows: Vec<ListRow>,
}

impl PageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_composition(composition: &Composition) -> Self {
        let mut list = Self::new();
        list.sync(composition);
        list
    }

    /// Rebuild the rows from the composition's current order
    pub fn sync(&mut self, composition: &Composition) {
        self.rows = composition
            .iter()
            .map(|page| ListRow {
                id: page.id(),
                label: page.label(),
            })
            .collect();
    }

    /// Move the row at `from` so it ends up at position `to`, the way a
    /// list widget's internal drag does
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.rows.len();
        for index in [from, to] {
            if index >= len {
                return Err(ComposeError::InvalidIndex { index, len });
            }
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        Ok(())
    }

    /// Push the visual order back into the composition
    pub fn reconcile(&self, composition: &mut Composition) -> Result<()> {
        composition.reorder(&self.ids())
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn ids(&self) -> Vec<PageId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rebuild a page order from visible labels alone: each label takes the
/// first not-yet-used descriptor with that label.
///
/// This cannot tell equal labels apart, so two rows reading the same text
/// can be bound to the wrong descriptors. [`PageList::reconcile`] does not
/// have that problem; this exists for callers that only have label text.
pub fn match_labels(pages: &[PageDescriptor], visible_labels: &[&str]) -> Vec<PageId> {
    let mut used = vec![false; pages.len()];
    let mut order = Vec::with_capacity(visible_labels.len());

    for label in visible_labels {
        let found = pages
            .iter()
            .enumerate()
            .find(|(i, page)| !used[*i] && page.label() == *label);
        if let Some((i, page)) = found {
            used[i] = true;
            order.push(page.id());
        }
    }

    order
}
