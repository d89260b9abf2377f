use crate::pdf::split::{split_document, ManifestEntry, SplitMode};
use crate::pdf::SourceFile;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    mode: &str,
    ranges: Option<&str>,
    output_dir: Q,
) -> Result<Vec<ManifestEntry>> {
    let output_dir = output_dir.as_ref();

    let source = SourceFile::read(&input)?;
    source.ensure_pdf()?;
    let doc = source.open()?;
    let mode: SplitMode = mode.parse()?;

    // Nothing touches the output directory until every file has been built.
    let output = split_document(&doc, source.base_name(), mode, ranges)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    for file in &output.files {
        let path = output_dir.join(file.entry.filename());
        std::fs::write(&path, &file.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let manifest = output.manifest();
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    eprintln!(
        "Split {} into {} file(s) in {}",
        input.as_ref().display(),
        manifest.len(),
        output_dir.display()
    );

    Ok(manifest)
}
