use crate::pdf::merge::merge_documents;
use crate::pdf::SourceFile;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(inputs: &[P], output: Q) -> Result<u32> {
    let output = output.as_ref();

    let sources = inputs
        .iter()
        .map(|input| {
            let source = SourceFile::read(input)?;
            source.ensure_pdf()?;
            Ok(source)
        })
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_documents(&sources)?;

    std::fs::write(output, &merged.bytes)
        .with_context(|| format!("Failed to save merged PDF: {}", output.display()))?;

    println!(
        "Merged {} files ({} pages) into {}",
        sources.len(),
        merged.result.pages,
        output.display()
    );

    Ok(merged.result.pages)
}
