//! Copying pages between documents

use crate::rotation::Rotation;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy the page `page_id` of `source` into `output` as a new page object
/// under `parent_id`, adding `rotation` to its `/Rotate`.
///
/// Objects the page references are copied once per `cache`; the page
/// dictionary itself is always new, so copying the same page twice gives
/// two pages that can be rotated independently.
pub(crate) fn copy_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    parent_id: ObjectId,
    rotation: Rotation,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let mut new_page = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        new_page.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }

    for key in INHERITABLE {
        if new_page.has(key) {
            continue;
        }
        if let Some(inherited) = find_inherited(source, page_dict, key) {
            new_page.set(key, copy_object_deep(output, source, inherited, cache)?);
        }
    }

    let current = match new_page.get(b"Rotate") {
        Ok(obj) => resolve_integer(output, obj).unwrap_or(0),
        Err(_) => 0,
    };
    let total = (current + rotation.degrees() as i64).rem_euclid(360);
    if total == 0 {
        new_page.remove(b"Rotate");
    } else {
        new_page.set("Rotate", Object::Integer(total));
    }

    new_page.set("Type", Object::Name(b"Page".to_vec()));
    new_page.set("Parent", Object::Reference(parent_id));

    Ok(output.add_object(new_page))
}

/// Walk up the `/Parent` chain looking for `key`
fn find_inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut current = page;
    // Bounded to survive malformed trees that loop
    for _ in 0..64 {
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value);
        }
        current = parent;
    }
    None
}

fn resolve_integer(doc: &Document, obj: &Object) -> Option<i64> {
    match obj {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| resolve_integer(doc, o)),
        _ => None,
    }
}

/// True for back-references to the page tree (`/P` of an annotation,
/// `/Parent` of a page node). Following them would drag the whole source
/// page tree into the output.
fn is_page_tree_link(source: &Document, key: &[u8], value: &Object) -> bool {
    if key != b"P" && key != b"Parent" {
        return false;
    }
    let Ok(id) = value.as_reference() else {
        return false;
    };
    source
        .get_dictionary(id)
        .and_then(|d| d.get(b"Type"))
        .and_then(Object::as_name)
        .map(|name| name == b"Page" || name == b"Pages")
        .unwrap_or(false)
}

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times. The target
/// id is reserved before recursing, so reference cycles terminate.
pub(crate) fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        if is_page_tree_link(source, key, value) {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}
