//! Preview rendering
//!
//! Turns page descriptors into RGB bitmaps:
//! 1. Image pages rotate their cached bitmap
//! 2. PDF pages are rasterized at `render_scale`, rotated by the rasterizer
//! 3. The raw bitmap is scaled for display (auto-fit or fixed zoom)
//!
//! Every call rebuilds the whole preview; compositions are expected to be
//! tens of pages, not thousands.

use crate::composition::{PageDescriptor, PageId, PageSource};
use crate::rotation::{Rotation, rotate_image};
use crate::settings::ComposeSettings;
use crate::types::*;
use crate::view::ViewState;
use image::{RgbImage, imageops};
use std::path::Path;

/// Rasterizes PDF pages. Rotation is clockwise, matching `/Rotate`.
pub trait Rasterizer {
    fn rasterize(
        &self,
        path: &Path,
        page_index: usize,
        scale: f32,
        rotation: Rotation,
    ) -> Result<RgbImage>;
}

/// Stand-in used when no PDF rasterizer is available. Image pages still
/// render; PDF pages fail with a render error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPdfRasterizer;

impl Rasterizer for NoPdfRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        page_index: usize,
        _scale: f32,
        _rotation: Rotation,
    ) -> Result<RgbImage> {
        Err(ComposeError::Render {
            page: page_index + 1,
            message: format!(
                "PDF rendering is not available for {} (built without pdfium)",
                path.display()
            ),
        })
    }
}

/// One page of the preview, ready for display
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub id: PageId,
    /// 1-based position in the composition
    pub page_number: usize,
    pub image: RgbImage,
}

impl RenderedPage {
    pub fn overlay_text(&self) -> String {
        format!("Page {}", self.page_number)
    }

    /// Top-left corner of a `label_width` x `label_height` badge placed
    /// in the bottom-right corner, `margin` pixels from both edges
    pub fn overlay_origin(&self, label_width: f32, label_height: f32, margin: f32) -> (f32, f32) {
        (
            self.image.width() as f32 - label_width - margin,
            self.image.height() as f32 - label_height - margin,
        )
    }
}

/// Bitmap of a page at its base resolution, rotation applied
pub fn render_page(
    page: &PageDescriptor,
    rasterizer: &dyn Rasterizer,
    settings: &ComposeSettings,
) -> Result<RgbImage> {
    match page.source() {
        PageSource::Image { image } => Ok(rotate_image(image, page.rotation())),
        PageSource::PdfPage { page_index } => rasterizer.rasterize(
            page.source_path(),
            *page_index,
            settings.render_scale,
            page.rotation(),
        ),
    }
}

/// Resize keeping the aspect ratio, with a smoothing filter
pub fn scale_bitmap(image: &RgbImage, scale: f32) -> RgbImage {
    if (scale - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }
    let width = ((image.width() as f32 * scale).round() as u32).max(1);
    let height = ((image.height() as f32 * scale).round() as u32).max(1);
    imageops::resize(image, width, height, imageops::FilterType::Triangle)
}

/// Render every page for display in a preview area `viewport_width`
/// pixels wide
pub fn render_preview(
    pages: &[PageDescriptor],
    view: &ViewState,
    viewport_width: f32,
    rasterizer: &dyn Rasterizer,
    settings: &ComposeSettings,
) -> Result<Vec<RenderedPage>> {
    let mut rendered = Vec::with_capacity(pages.len());

    for (i, page) in pages.iter().enumerate() {
        let raw = render_page(page, rasterizer, settings)?;
        let scale = view.display_scale(raw.width(), viewport_width, settings.preview_margin);
        log::debug!(
            "Rendered page {} ({}x{}), display scale {:.3}",
            i + 1,
            raw.width(),
            raw.height(),
            scale
        );

        rendered.push(RenderedPage {
            id: page.id(),
            page_number: i + 1,
            image: scale_bitmap(&raw, scale),
        });
    }

    Ok(rendered)
}

#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumRasterizer, init_pdfium};

#[cfg(feature = "pdfium")]
mod pdfium {
    use super::*;
    use pdfium_render::prelude::*;

    /// Initialize Pdfium, trying the vendored library first, then falling back to system
    pub fn init_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
        // When running from cargo, the working directory is the workspace root
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        if let Some(vendor_path) = vendor_path {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
            {
                return Ok(Pdfium::new(binding));
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }

    /// [`Rasterizer`] backed by the Pdfium library
    pub struct PdfiumRasterizer {
        pdfium: Pdfium,
    }

    impl PdfiumRasterizer {
        pub fn new() -> Result<Self> {
            let pdfium = init_pdfium().map_err(|e| ComposeError::Render {
                page: 0,
                message: format!("Failed to initialize Pdfium: {}", e),
            })?;
            Ok(Self { pdfium })
        }
    }

    fn render_rotation(rotation: Rotation) -> PdfPageRenderRotation {
        match rotation {
            Rotation::None => PdfPageRenderRotation::None,
            Rotation::Clockwise90 => PdfPageRenderRotation::Degrees90,
            Rotation::Clockwise180 => PdfPageRenderRotation::Degrees180,
            Rotation::Clockwise270 => PdfPageRenderRotation::Degrees270,
        }
    }

    impl Rasterizer for PdfiumRasterizer {
        fn rasterize(
            &self,
            path: &Path,
            page_index: usize,
            scale: f32,
            rotation: Rotation,
        ) -> Result<RgbImage> {
            let render_err = |e: PdfiumError| ComposeError::Render {
                page: page_index + 1,
                message: e.to_string(),
            };

            let document = self
                .pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| ComposeError::source_open(path, e))?;
            let index = u16::try_from(page_index).map_err(|_| ComposeError::Render {
                page: page_index + 1,
                message: "page index exceeds Pdfium's limit".to_string(),
            })?;
            let page = document.pages().get(index).map_err(render_err)?;

            let config = PdfRenderConfig::new()
                .scale_page_by_factor(scale)
                .rotate(render_rotation(rotation), true);

            let bitmap = page.render_with_config(&config).map_err(render_err)?;
            Ok(bitmap.as_image().into_rgb8())
        }
    }
}
