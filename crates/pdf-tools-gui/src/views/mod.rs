pub mod controls;
pub mod dialogs;
pub mod page_list;
pub mod preview;

use pdf_compose::PageId;
use std::path::PathBuf;

/// Something the user asked for. Views only report actions; the app
/// applies them to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PickFiles,
    AddFiles(Vec<PathBuf>),
    ZoomIn,
    ZoomOut,
    Fit,
    /// Clockwise degrees
    Rotate(i32),
    Duplicate,
    Delete,
    Export,
    Clear,
    /// Row of the page list, which always matches the composition
    Select(usize),
    /// Page clicked in the preview, which may lag behind edits
    SelectPage(PageId),
    /// Row dragged from one position to another
    MoveRow { from: usize, to: usize },
}
