mod common;

use common::*;
use image::RgbImage;
use pdf_compose::*;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Rasterizer that records its calls and returns a blank page of the
/// rotated size
#[derive(Default)]
struct RecordingRasterizer {
    calls: RefCell<Vec<(PathBuf, usize, f32, Rotation)>>,
}

impl Rasterizer for RecordingRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        page_index: usize,
        scale: f32,
        rotation: Rotation,
    ) -> Result<RgbImage> {
        self.calls
            .borrow_mut()
            .push((path.to_path_buf(), page_index, scale, rotation));
        let (w, h) = ((100.0 * scale) as u32, (200.0 * scale) as u32);
        Ok(if rotation.is_quarter_turn() {
            RgbImage::new(h, w)
        } else {
            RgbImage::new(w, h)
        })
    }
}

#[test]
fn test_pdf_pages_render_at_base_scale_with_rotation() {
    let mut composition = Composition::new();
    composition.add_pdf_pages("doc.pdf", 2);
    composition.rotate(1, 90).unwrap();

    let rasterizer = RecordingRasterizer::default();
    let view = ViewState {
        zoom_factor: 1.0,
        auto_fit: false,
    };
    let pages = render_preview(
        composition.pages(),
        &view,
        800.0,
        &rasterizer,
        &ComposeSettings::default(),
    )
    .unwrap();

    let calls = rasterizer.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, 0);
    assert_eq!(calls[0].2, 2.0);
    assert_eq!(calls[1].3, Rotation::Clockwise90);

    assert_eq!(pages[0].image.dimensions(), (200, 400));
    assert_eq!(pages[1].image.dimensions(), (400, 200));
    assert_eq!(pages[1].page_number, 2);
}

#[test]
fn test_auto_fit_scales_to_viewport() {
    let mut composition = Composition::new();
    composition.add_decoded_image("a.png", RgbImage::new(400, 100));
    composition.add_decoded_image("b.png", RgbImage::new(100, 300));
    composition.rotate(1, 90).unwrap();

    let settings = ComposeSettings::default();
    let pages = render_preview(
        composition.pages(),
        &ViewState::default(),
        240.0,
        &NoPdfRasterizer,
        &settings,
    )
    .unwrap();

    // 240 - 40 margin = 200 px for every page
    assert_eq!(pages[0].image.dimensions(), (200, 50));
    assert_eq!(pages[1].image.dimensions(), (200, 67));
}

#[test]
fn test_fixed_zoom_scales_every_page() {
    let mut composition = Composition::new();
    composition.add_decoded_image("a.png", RgbImage::new(100, 50));

    let mut view = ViewState::default();
    view.adjust_zoom(1.5);
    let pages = render_preview(
        composition.pages(),
        &view,
        10_000.0,
        &NoPdfRasterizer,
        &ComposeSettings::default(),
    )
    .unwrap();
    assert_eq!(pages[0].image.dimensions(), (150, 75));
}

#[test]
fn test_render_failure_stops_preview() {
    let mut composition = Composition::new();
    composition.add_decoded_image("a.png", RgbImage::new(10, 10));
    composition.add_pdf_pages("doc.pdf", 1);

    let result = render_preview(
        composition.pages(),
        &ViewState::default(),
        500.0,
        &NoPdfRasterizer,
        &ComposeSettings::default(),
    );
    assert!(matches!(result, Err(ComposeError::Render { page: 1, .. })));
}

#[test]
fn test_image_preview_matches_export_for_every_rotation() {
    let source = test_image();
    for delta in [0, 90, 180, 270, -90] {
        let mut composition = Composition::new();
        composition.add_decoded_image("photo.png", source.clone());
        composition.rotate(0, delta).unwrap();

        let preview = render_page(
            &composition.pages()[0],
            &NoPdfRasterizer,
            &ComposeSettings::default(),
        )
        .unwrap();

        let doc = assemble(composition.pages(), &ComposeSettings::default()).unwrap();
        let ids = page_ids(&doc);
        let (width, height, data) = page_image(&doc, ids[0]);

        assert_eq!((width as u32, height as u32), preview.dimensions());
        assert_eq!(data, preview.into_raw(), "rotation {delta}");
        assert_eq!(rotate_of(&doc, ids[0]), 0);
    }
}

#[test]
fn test_pdf_preview_rotation_matches_export() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "tilted.pdf", create_test_pdf_with(1, Some(90)));

    for delta in [0, 90, 180, 270] {
        let mut composition = Composition::new();
        composition.add_pdf(&pdf).unwrap();
        composition.rotate(0, delta).unwrap();

        let rasterizer = RecordingRasterizer::default();
        render_page(
            &composition.pages()[0],
            &rasterizer,
            &ComposeSettings::default(),
        )
        .unwrap();
        let requested = rasterizer.calls.borrow()[0].3;

        let doc = assemble(composition.pages(), &ComposeSettings::default()).unwrap();
        let exported = rotate_of(&doc, page_ids(&doc)[0]);

        // The rasterizer honours the page's own /Rotate and adds the
        // requested turn on top; export stores the same sum
        assert_eq!(
            (90 + requested.degrees() as i64) % 360,
            exported,
            "rotation {delta}"
        );
    }
}
