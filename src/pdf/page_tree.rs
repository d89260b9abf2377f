//! Flat page trees built from an explicit page list.

use crate::error::PdfError;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;

/// Page attributes a page may pick up from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Hang every page in `page_refs` directly off the catalog's root `Pages`
/// node, in order.
///
/// Pages left out of `page_refs` become unreachable; callers follow up with
/// `prune_objects`.
pub fn rebuild_page_tree(doc: &mut Document, page_refs: &[ObjectId]) -> Result<(), PdfError> {
    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|source| PdfError::Format { file: None, source })?;

    for &page_id in page_refs {
        let inherited = inherited_attributes(doc, page_id);
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|source| PdfError::Format { file: None, source })?;
        for (key, value) in inherited {
            if !page.has(&key) {
                page.set(key, value);
            }
        }
        page.set("Parent", Object::Reference(pages_id));
    }

    let root = doc
        .get_dictionary_mut(pages_id)
        .map_err(|source| PdfError::Format { file: None, source })?;
    root.set(
        "Kids",
        Object::Array(page_refs.iter().map(|&id| Object::Reference(id)).collect()),
    );
    root.set("Count", Object::Integer(page_refs.len() as i64));
    root.remove(b"Parent");

    Ok(())
}

/// Collect inheritable attributes from the page's ancestors, nearest first.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> BTreeMap<Vec<u8>, Object> {
    let mut found = BTreeMap::new();
    let mut seen = vec![page_id];
    let mut parent = parent_of(doc, page_id);

    while let Some(id) = parent {
        // Malformed trees can loop.
        if seen.contains(&id) {
            break;
        }
        seen.push(id);

        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        for key in INHERITABLE {
            if let Ok(value) = node.get(key) {
                found.entry(key.to_vec()).or_insert_with(|| value.clone());
            }
        }
        parent = parent_of(doc, id);
    }

    found
}

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_dictionary(id)
        .ok()?
        .get(b"Parent")
        .ok()?
        .as_reference()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{create_test_pdf, has_media_box, page_markers};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rebuild_keeps_listed_pages_in_order() {
        let mut doc = Document::load_mem(&create_test_pdf(4, "T")).unwrap();
        let pages = doc.get_pages();
        let picked = vec![pages[&3], pages[&1]];

        rebuild_page_tree(&mut doc, &picked).unwrap();
        doc.prune_objects();

        assert_eq!(page_markers(&doc), vec!["T-Page-3", "T-Page-1"]);
        for id in picked {
            assert!(doc.get_dictionary(id).unwrap().has(b"MediaBox"));
            assert!(has_media_box(&doc, id));
        }
    }

    #[test]
    fn test_dropped_pages_are_pruned() {
        let mut doc = Document::load_mem(&create_test_pdf(3, "T")).unwrap();
        let pages = doc.get_pages();
        let (kept, dropped) = (pages[&2], pages[&1]);

        rebuild_page_tree(&mut doc, &[kept]).unwrap();
        doc.prune_objects();

        assert!(doc.get_object(dropped).is_err());
        assert_eq!(doc.get_pages().len(), 1);
    }
}
