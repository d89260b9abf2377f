//! In-memory PDFs for tests.

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};

/// Build a PDF with `num_pages` pages whose content streams each draw
/// `<prefix>-Page-<n>`.
pub fn create_test_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{}-Page-{}", prefix, i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap(),
        ));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        let page_id = doc.add_object(page);
        kids.push(Object::Reference(page_id));
    }

    // MediaBox lives on the tree root so pages have to inherit it.
    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(num_pages as i64));
    pages.set("Kids", Object::Array(kids));
    pages.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// The marker string drawn on each page, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').unwrap() + 1;
            let end = text.rfind(')').unwrap();
            text[start..end].to_string()
        })
        .collect()
}

pub fn markers_of(bytes: &[u8]) -> Vec<String> {
    page_markers(&Document::load_mem(bytes).unwrap())
}

/// Whether a page ends up with a MediaBox of its own or through its parents.
pub fn has_media_box(doc: &Document, page_id: lopdf::ObjectId) -> bool {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc.get_dictionary(id).unwrap();
        if dict.has(b"MediaBox") {
            return true;
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok());
    }
    false
}
