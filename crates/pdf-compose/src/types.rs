use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Page position {index} is out of range (composition has {len} pages)")]
    InvalidIndex { index: usize, len: usize },
    #[error("Invalid page order: {0}")]
    InvalidPermutation(String),
    #[error("Rotation of {0}° is not a multiple of 90°")]
    InvalidRotation(i32),
    #[error("Failed to open {}: {message}", path.display())]
    SourceOpen { path: PathBuf, message: String },
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),
    #[error("Export failed: {0}")]
    Export(Box<ComposeError>),
    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to export")]
    NoPages,
}

impl ComposeError {
    pub(crate) fn source_open(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::SourceOpen {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a failure raised while assembling or writing the output
    pub(crate) fn export(cause: ComposeError) -> Self {
        match cause {
            // Already wrapped further down the pipeline
            ComposeError::Export(_) => cause,
            other => Self::Export(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Kind of file a page descriptor was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PdfPage,
    Image,
}

/// Summary returned by a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Where the output document was written
    pub path: PathBuf,
    /// Number of pages in the output document
    pub page_count: usize,
}
