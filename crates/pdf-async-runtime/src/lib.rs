use std::path::PathBuf;

// Re-export types from the library crate
pub use pdf_compose::{ComposeSettings, ExportSummary, PageDescriptor, RenderedPage, ViewState};

mod worker;

pub use worker::{RasterizerFactory, worker_task};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PdfCommand {
    /// Render every page of a composition snapshot for display
    RenderPreview {
        pages: Vec<PageDescriptor>,
        view: ViewState,
        viewport_width: f32,
        settings: ComposeSettings,
        /// Echoed back so the UI can drop stale results
        generation: u64,
    },
    Export {
        pages: Vec<PageDescriptor>,
        output_path: PathBuf,
        settings: ComposeSettings,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PdfUpdate {
    PreviewRendered {
        generation: u64,
        pages: Vec<RenderedPage>,
    },
    PreviewFailed {
        generation: u64,
        message: String,
    },
    /// Sent exactly once per `Export` command
    ExportFinished {
        result: Result<ExportSummary, String>,
    },
}
