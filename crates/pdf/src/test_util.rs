//! Helpers for inspecting generated PDFs in tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

pub(crate) fn pdf_pages(path: &Path) -> Vec<ObjectId> {
    let doc = Document::load(path).unwrap();
    doc.get_pages().into_values().collect()
}

pub(crate) fn page_operations(path: &Path, page_number: u32) -> Vec<Operation> {
    let doc = Document::load(path).unwrap();
    let page_id = doc.get_pages()[&page_number];
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

/// Strings shown with `Tj` on a page, decoded as Latin-1.
pub(crate) fn page_strings(path: &Path, page_number: u32) -> Vec<String> {
    page_operations(path, page_number)
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
            _ => None,
        })
        .collect()
}

/// Pixel size of the image drawn on each page, in page order.
pub(crate) fn page_image_sizes(path: &Path) -> Vec<(i64, i64)> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources_id = page.get(b"Resources").unwrap().as_reference().unwrap();
            let resources = doc.get_dictionary(resources_id).unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            let image_id = xobjects.get(b"Im1").unwrap().as_reference().unwrap();
            let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
            (
                image.dict.get(b"Width").unwrap().as_i64().unwrap(),
                image.dict.get(b"Height").unwrap().as_i64().unwrap(),
            )
        })
        .collect()
}
