mod composition;
pub mod export;
mod page_list;
pub mod render;
mod rotation;
mod session;
mod settings;
mod types;
mod view;

pub use composition::{Composition, PageDescriptor, PageId, PageSource};
pub use export::{assemble, export, export_sync, image_document};
pub use page_list::{ListRow, PageList, match_labels};
pub use render::{NoPdfRasterizer, Rasterizer, RenderedPage, render_page, render_preview};
pub use rotation::{Rotation, rotate_image};
pub use session::{AddReport, Session, SessionEdit};
pub use settings::ComposeSettings;
pub use types::*;
pub use view::{ViewState, ZOOM_MAX, ZOOM_MIN};
