use crate::pdf::SourceFile;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let source = SourceFile::read(&path)?;
    source.ensure_pdf()?;
    let doc = source.open()?;

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", doc.page_count());

    Ok(())
}
