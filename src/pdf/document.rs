use crate::error::PdfError;
use crate::pdf::page_tree::rebuild_page_tree;
use anyhow::{Context, Result};
use lopdf::{Document, ObjectId};
use std::path::Path;

/// How far into an upload the `%PDF-` header may appear.
const SIGNATURE_WINDOW: usize = 1024;

/// An uploaded or on-disk input: its display name plus the raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceFile {
            name: name.into(),
            bytes,
        }
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("input.pdf")
            .to_string();
        Ok(SourceFile { name, bytes })
    }

    /// Reject anything without a `.pdf` extension or a `%PDF-` header
    /// before it reaches the parser.
    pub fn ensure_pdf(&self) -> Result<(), PdfError> {
        let has_extension = self.name.to_ascii_lowercase().ends_with(".pdf");
        let window = &self.bytes[..self.bytes.len().min(SIGNATURE_WINDOW)];
        let has_signature = window.windows(5).any(|w| w == b"%PDF-");

        if has_extension && has_signature {
            Ok(())
        } else {
            Err(PdfError::NotAPdf {
                file: self.name.clone(),
            })
        }
    }

    /// File name with its `.pdf` extension removed, used to name outputs.
    pub fn base_name(&self) -> &str {
        let name = self.name.as_str();
        let split = name.len().saturating_sub(4);
        match (name.get(..split), name.get(split..)) {
            (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".pdf") => stem,
            _ => name,
        }
    }

    pub fn open(&self) -> Result<PdfDocument, PdfError> {
        PdfDocument::from_bytes(&self.bytes).map_err(|e| e.in_file(&self.name))
    }
}

/// A parsed PDF whose page count is fixed for its whole lifetime.
///
/// Pages are never copied out by mutating this value; every extraction works
/// on a clone, so the same page can be read any number of times.
pub struct PdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|source| PdfError::Format {
            file: None,
            source,
        })?;
        // get_pages is a BTreeMap keyed by page number, so this is already sorted.
        let pages = doc.get_pages().into_values().collect();
        Ok(PdfDocument { doc, pages })
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        (1..).zip(self.pages.iter().copied()).collect()
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }

    /// Copy a single page into a new one-page document.
    pub fn copy_page(&self, page: u32) -> Result<Document, PdfError> {
        self.extract_pages(&[page])
    }

    /// Extract specific pages, in the order given, to a new document.
    ///
    /// The clone's page tree is replaced by a flat one holding just these
    /// pages, and everything no longer reachable is pruned in one pass.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document, PdfError> {
        let total = self.page_count();

        let page_refs = pages
            .iter()
            .map(|&p| {
                p.checked_sub(1)
                    .and_then(|i| self.pages.get(i as usize))
                    .copied()
                    .ok_or_else(|| PdfError::InvalidRange {
                        token: p.to_string(),
                        total_pages: total,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut new_doc = self.doc.clone();
        rebuild_page_tree(&mut new_doc, &page_refs)?;
        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Serialize a document to bytes.
    pub fn to_bytes(doc: &mut Document, name: &str) -> Result<Vec<u8>, PdfError> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).map_err(|e| PdfError::Write {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(buffer)
    }
}
