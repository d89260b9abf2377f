//! Split one PDF into per-page or per-range documents.

use crate::error::PdfError;
use crate::page_range::{parse_ranges, PageRange};
use crate::pdf::document::PdfDocument;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// One output per page.
    Single,
    /// One output per comma-separated range token.
    Range,
}

impl FromStr for SplitMode {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(SplitMode::Single),
            "range" => Ok(SplitMode::Range),
            other => Err(PdfError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// Describes one produced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Page {
        filename: String,
        page: u32,
    },
    Range {
        filename: String,
        range: String,
        page_count: u32,
    },
}

impl ManifestEntry {
    pub fn filename(&self) -> &str {
        match self {
            ManifestEntry::Page { filename, .. } | ManifestEntry::Range { filename, .. } => {
                filename
            }
        }
    }
}

pub struct SplitFile {
    pub entry: ManifestEntry,
    pub bytes: Vec<u8>,
}

/// The complete result of a split; never partially filled.
pub struct SplitOutput {
    pub files: Vec<SplitFile>,
}

impl SplitOutput {
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.files.iter().map(|f| f.entry.clone()).collect()
    }
}

/// Split `doc` according to `mode`.
///
/// In range mode every token of `ranges` is validated before the first
/// output is built, so an error never comes with partial output.
pub fn split_document(
    doc: &PdfDocument,
    base_name: &str,
    mode: SplitMode,
    ranges: Option<&str>,
) -> Result<SplitOutput, PdfError> {
    let total_pages = doc.page_count();

    let files = match mode {
        SplitMode::Single => (1..=total_pages)
            .map(|page| split_page(doc, base_name, page))
            .collect::<Result<Vec<_>, _>>()?,
        SplitMode::Range => {
            let ranges = parse_ranges(ranges.unwrap_or_default(), total_pages)?;
            ranges
                .iter()
                .map(|range| split_range(doc, base_name, range))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(SplitOutput { files })
}

fn split_page(doc: &PdfDocument, base_name: &str, page: u32) -> Result<SplitFile, PdfError> {
    let filename = format!("{}_page_{}.pdf", base_name, page);
    let mut out = doc.copy_page(page)?;
    let bytes = PdfDocument::to_bytes(&mut out, &filename)?;
    debug!(%filename, page, size = bytes.len(), "produced page");

    Ok(SplitFile {
        entry: ManifestEntry::Page { filename, page },
        bytes,
    })
}

fn split_range(
    doc: &PdfDocument,
    base_name: &str,
    range: &PageRange,
) -> Result<SplitFile, PdfError> {
    let filename = format!("{}_pages_{}.pdf", base_name, range);
    let pages: Vec<u32> = range.pages().collect();
    let mut out = doc.extract_pages(&pages)?;
    let bytes = PdfDocument::to_bytes(&mut out, &filename)?;
    debug!(%filename, %range, size = bytes.len(), "produced range");

    Ok(SplitFile {
        entry: ManifestEntry::Range {
            filename,
            range: range.to_string(),
            page_count: range.page_count(),
        },
        bytes,
    })
}
