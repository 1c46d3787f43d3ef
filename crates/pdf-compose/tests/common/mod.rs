#![allow(dead_code)]

use image::{Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};

/// Width of page `i` in fixtures, so page order can be read back from output
pub fn page_width(i: usize) -> i64 {
    600 + i as i64 * 10
}

pub fn create_test_pdf(num_pages: usize) -> Document {
    create_test_pdf_with(num_pages, None)
}

/// Test document whose pages tree optionally carries an inherited `/Rotate`
pub fn create_test_pdf_with(num_pages: usize, inherited_rotate: Option<i64>) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(page_width(i)),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    // Resources live on the pages node and are inherited by every page
    let mut pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        ("Resources", Object::Dictionary(resources)),
    ]);
    if let Some(rotate) = inherited_rotate {
        pages_dict.set("Rotate", Object::Integer(rotate));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn write_pdf(dir: &Path, name: &str, mut doc: Document) -> PathBuf {
    let path = dir.join(name);
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// 3x2 image with a distinct colour in every pixel
pub fn test_image() -> RgbImage {
    RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8 * 80, y as u8 * 120, 200]))
}

pub fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("not a number: {:?}", other),
    }
}

pub fn media_box_width(doc: &Document, page_id: ObjectId) -> f32 {
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    number(&media_box[2])
}

pub fn rotate_of(doc: &Document, page_id: ObjectId) -> i64 {
    let page = doc.get_dictionary(page_id).unwrap();
    page.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0)
}

/// Width, height and decoded RGB bytes of the `/Im0` image on a page
pub fn page_image(doc: &Document, page_id: ObjectId) -> (i64, i64, Vec<u8>) {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = match page.get(b"Resources").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        obj => obj.as_dict().unwrap(),
    };
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
    let stream = doc.get_object(image_id).unwrap().as_stream().unwrap();

    let width = stream.dict.get(b"Width").unwrap().as_i64().unwrap();
    let height = stream.dict.get(b"Height").unwrap().as_i64().unwrap();
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    (width, height, data)
}
