pub mod document;
pub mod merge;
pub mod page_tree;
pub mod split;

#[cfg(test)]
pub mod fixtures;

pub use document::{PdfDocument, SourceFile};
