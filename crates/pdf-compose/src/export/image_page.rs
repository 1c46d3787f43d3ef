//! Wrapping a bitmap in a one-page PDF, entirely in memory

use crate::types::*;
use image::RgbImage;
use lopdf::{Dictionary, Document, Object, Stream};

/// Build a document with a single page showing `image` edge to edge.
/// The page measures `pixels * 72 / dpi` points in each direction.
pub fn image_document(image: &RgbImage, dpi: f32) -> Result<Document> {
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(ComposeError::Config(format!("Invalid image DPI: {dpi}")));
    }
    let (width_px, height_px) = image.dimensions();
    let width_pt = width_px as f32 * 72.0 / dpi;
    let height_pt = height_px as f32 * 72.0 / dpi;

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let img_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(width_px as i64)),
        ("Height", Object::Integer(height_px as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ]);
    let img_id = doc.add_object(Stream::new(img_dict, image.as_raw().clone()));

    let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q\n", width_pt, height_pt);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(img_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}
