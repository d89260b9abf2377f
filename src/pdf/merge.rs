//! Concatenate several PDFs into one.

use crate::error::PdfError;
use crate::pdf::document::{PdfDocument, SourceFile};
use crate::pdf::page_tree::rebuild_page_tree;
use lopdf::{Object, ObjectId};
use serde::Serialize;
use tracing::debug;

pub const MERGED_FILENAME: &str = "merged.pdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    pub filename: String,
    pub pages: u32,
}

pub struct MergeOutput {
    pub result: MergeResult,
    pub bytes: Vec<u8>,
}

/// Merge `sources` in order.
///
/// Every source is parsed before anything is assembled, so a broken input
/// fails the merge (naming that input) without producing output.
pub fn merge_documents(sources: &[SourceFile]) -> Result<MergeOutput, PdfError> {
    if sources.len() < 2 {
        return Err(PdfError::TooFewFiles {
            count: sources.len(),
        });
    }

    let mut loaded = Vec::with_capacity(sources.len());
    for source in sources {
        loaded.push(source.open()?);
    }

    let mut loaded = loaded.into_iter();
    let Some(first) = loaded.next() else {
        return Err(PdfError::TooFewFiles { count: 0 });
    };
    let mut page_refs = page_refs_of(&first);
    let mut dest = first.into_inner();

    for source in loaded {
        let source_pages = page_refs_of(&source);
        let source = source.into_inner();
        let offset = dest.max_id;
        let source_max_id = source.max_id;

        for (id, object) in source.objects {
            dest.objects
                .insert((id.0 + offset, id.1), remap_refs(object, offset));
        }
        page_refs.extend(source_pages.into_iter().map(|id| (id.0 + offset, id.1)));
        dest.max_id = dest.max_id.max(source_max_id + offset);
    }

    rebuild_page_tree(&mut dest, &page_refs)?;
    dest.prune_objects();

    let pages = dest.get_pages().len() as u32;
    let bytes = PdfDocument::to_bytes(&mut dest, MERGED_FILENAME)?;
    debug!(sources = sources.len(), pages, size = bytes.len(), "merged");

    Ok(MergeOutput {
        result: MergeResult {
            filename: MERGED_FILENAME.to_string(),
            pages,
        },
        bytes,
    })
}

fn page_refs_of(doc: &PdfDocument) -> Vec<ObjectId> {
    doc.page_ids().into_iter().map(|(_, id)| id).collect()
}

fn remap_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|o| remap_refs(o, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_refs(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{create_test_pdf, has_media_box, markers_of};
    use crate::pdf::split::{split_document, SplitMode};
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn source(name: &str, pages: u32) -> SourceFile {
        SourceFile::new(format!("{name}.pdf"), create_test_pdf(pages, name))
    }

    #[test]
    fn test_merge_empty_fails() {
        assert!(matches!(
            merge_documents(&[]),
            Err(PdfError::TooFewFiles { count: 0 })
        ));
    }

    #[test]
    fn test_merge_single_document_fails() {
        assert!(matches!(
            merge_documents(&[source("Only", 3)]),
            Err(PdfError::TooFewFiles { count: 1 })
        ));
    }

    #[test]
    fn test_merge_two_documents_combines_pages() {
        let out = merge_documents(&[source("DocA", 2), source("DocB", 3)]).unwrap();

        assert_eq!(
            out.result,
            MergeResult {
                filename: "merged.pdf".into(),
                pages: 5,
            }
        );
        assert_eq!(
            markers_of(&out.bytes),
            vec![
                "DocA-Page-1",
                "DocA-Page-2",
                "DocB-Page-1",
                "DocB-Page-2",
                "DocB-Page-3",
            ]
        );
    }

    #[test]
    fn test_merge_handles_different_sizes() {
        let out =
            merge_documents(&[source("Large", 10), source("Small", 1), source("Medium", 5)])
                .unwrap();
        assert_eq!(out.result.pages, 16);
        assert_eq!(markers_of(&out.bytes)[10], "Small-Page-1");
    }

    #[test]
    fn test_merged_pages_keep_inherited_media_box() {
        let out = merge_documents(&[source("A", 1), source("B", 2)]).unwrap();
        let doc = Document::load_mem(&out.bytes).unwrap();
        for page_id in doc.get_pages().into_values() {
            assert!(has_media_box(&doc, page_id));
        }
    }

    #[test]
    fn test_broken_source_is_named() {
        let broken = SourceFile::new("second.pdf", b"%PDF-1.4\ntruncated".to_vec());
        match merge_documents(&[source("First", 1), broken, source("Third", 1)]) {
            Err(PdfError::Format { file, .. }) => assert_eq!(file.as_deref(), Some("second.pdf")),
            Err(other) => panic!("unexpected {other:?}"),
            Ok(_) => panic!("merge should have failed"),
        }
    }

    #[test]
    fn test_split_then_merge_round_trip() {
        let original = create_test_pdf(4, "Round");
        let doc = PdfDocument::from_bytes(&original).unwrap();
        let split = split_document(&doc, "round", SplitMode::Single, None).unwrap();

        let parts: Vec<SourceFile> = split
            .files
            .into_iter()
            .map(|f| SourceFile::new(f.entry.filename(), f.bytes))
            .collect();
        let merged = merge_documents(&parts).unwrap();

        assert_eq!(merged.result.pages, 4);
        assert_eq!(markers_of(&merged.bytes), markers_of(&original));
    }
}
