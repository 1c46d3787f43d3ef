mod common;

use common::*;
use lopdf::Document;
use pdf_compose::*;
use tempfile::TempDir;

#[test]
fn test_export_empty_composition() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.pdf");
    let result = export_sync(&[], &out, &ComposeSettings::default());
    assert!(matches!(result, Err(ComposeError::NoPages)));
    assert!(!out.exists());
}

#[test]
fn test_missing_source_aborts_without_touching_target() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "gone.pdf", create_test_pdf(2));
    let png = write_png(dir.path(), "pic.png", &test_image());

    let mut composition = Composition::new();
    composition.add_path(&png).unwrap();
    composition.add_pdf(&pdf).unwrap();
    std::fs::remove_file(&pdf).unwrap();

    let out = dir.path().join("out.pdf");
    std::fs::write(&out, b"previous export").unwrap();

    let result = export_sync(composition.pages(), &out, &ComposeSettings::default());
    match result {
        Err(ComposeError::Export(cause)) => {
            assert!(matches!(*cause, ComposeError::SourceOpen { .. }));
        }
        other => panic!("Expected Export error, got {:?}", other),
    }
    assert_eq!(std::fs::read(&out).unwrap(), b"previous export");

    // No temp files left behind either
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_page_index_beyond_source_fails() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "short.pdf", create_test_pdf(1));

    let mut composition = Composition::new();
    composition.add_pdf_pages(&pdf, 2);

    let out = dir.path().join("out.pdf");
    let result = export_sync(composition.pages(), &out, &ComposeSettings::default());
    assert!(matches!(result, Err(ComposeError::Export(_))));
    assert!(!out.exists());
}

#[test]
fn test_unwritable_destination_is_an_export_error() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "doc.pdf", create_test_pdf(1));
    let mut composition = Composition::new();
    composition.add_pdf(&pdf).unwrap();

    let out = dir.path().join("no-such-dir").join("out.pdf");
    let result = export_sync(composition.pages(), &out, &ComposeSettings::default());
    match result {
        Err(ComposeError::Export(cause)) => assert!(matches!(*cause, ComposeError::Io(_))),
        other => panic!("Expected Export error, got {:?}", other),
    }
}

#[test]
fn test_duplicates_are_separate_page_objects() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "doc.pdf", create_test_pdf(1));

    let mut composition = Composition::new();
    composition.add_pdf(&pdf).unwrap();
    composition.duplicate(0).unwrap();
    composition.rotate(1, -90).unwrap();

    let doc = assemble(composition.pages(), &ComposeSettings::default()).unwrap();
    let ids = page_ids(&doc);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(rotate_of(&doc, ids[0]), 0);
    assert_eq!(rotate_of(&doc, ids[1]), 270);

    // Shared content is copied once
    let contents: Vec<_> = ids
        .iter()
        .map(|&id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Contents")
                .unwrap()
                .as_reference()
                .unwrap()
        })
        .collect();
    assert_eq!(contents[0], contents[1]);
}

#[test]
fn test_inherited_attributes_are_resolved() {
    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "rotated.pdf", create_test_pdf_with(2, Some(90)));

    let mut composition = Composition::new();
    composition.add_pdf(&pdf).unwrap();
    composition.rotate(1, 270).unwrap();

    let doc = assemble(composition.pages(), &ComposeSettings::default()).unwrap();
    let ids = page_ids(&doc);

    // Inherited /Rotate 90 carried over, then added to
    assert_eq!(rotate_of(&doc, ids[0]), 90);
    assert_eq!(rotate_of(&doc, ids[1]), 0);

    // Resources came from the source pages node
    let page = doc.get_dictionary(ids[0]).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    assert!(resources.has(b"Font"));

    // Parent points into the output tree
    let parent = page.get(b"Parent").unwrap().as_reference().unwrap();
    let pages = doc.get_dictionary(parent).unwrap();
    assert_eq!(pages.get(b"Count").unwrap().as_i64().unwrap(), 2);
}

#[test]
fn test_mixed_sources_keep_composition_order() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", create_test_pdf(2));
    let png = write_png(dir.path(), "pic.png", &test_image());

    let mut composition = Composition::new();
    composition.add_pdf(&a).unwrap();
    composition.add_image(&png).unwrap();
    composition.reorder_indices(&[2, 1, 0]).unwrap();

    let out = dir.path().join("mixed.pdf");
    let summary = export_sync(composition.pages(), &out, &ComposeSettings::default()).unwrap();
    assert_eq!(summary.page_count, 3);

    let doc = Document::load(&out).unwrap();
    let ids = page_ids(&doc);
    // Image page: 3px at 72 dpi is 3pt wide
    assert_eq!(media_box_width(&doc, ids[0]), 3.0);
    assert_eq!(media_box_width(&doc, ids[1]), page_width(1) as f32);
    assert_eq!(media_box_width(&doc, ids[2]), page_width(0) as f32);
}

#[test]
fn test_image_dpi_setting_sizes_image_pages() {
    let mut composition = Composition::new();
    composition.add_decoded_image("wide.png", image::RgbImage::new(300, 150));

    let settings = ComposeSettings {
        image_dpi: 150.0,
        ..Default::default()
    };
    let doc = assemble(composition.pages(), &settings).unwrap();
    let ids = page_ids(&doc);
    assert_eq!(media_box_width(&doc, ids[0]), 144.0);
}

#[cfg(unix)]
#[test]
fn test_overwrite_keeps_target_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let pdf = write_pdf(dir.path(), "doc.pdf", create_test_pdf(1));
    let mut composition = Composition::new();
    composition.add_pdf(&pdf).unwrap();

    for mode in [0o644, 0o640] {
        let out = dir.path().join(format!("out-{mode:o}.pdf"));
        std::fs::write(&out, b"previous export").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode)).unwrap();

        export_sync(composition.pages(), &out, &ComposeSettings::default()).unwrap();

        assert_ne!(std::fs::read(&out).unwrap(), b"previous export");
        let written = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(written, mode);
    }
}

#[cfg(unix)]
#[test]
fn test_new_export_is_not_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let mut composition = Composition::new();
    composition.add_decoded_image("pic.png", test_image());

    let out = dir.path().join("fresh.pdf");
    export_sync(composition.pages(), &out, &ComposeSettings::default()).unwrap();

    let written = std::fs::metadata(&out).unwrap().permissions().mode() & 0o777;
    assert_eq!(written, 0o644);
}
