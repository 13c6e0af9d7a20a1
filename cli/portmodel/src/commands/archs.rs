//! `portmodel archs`: list architectures of a document.

use std::path::Path;

use anyhow::{Context, Result};
use portmodel_doc::{load_document, Document};

/// Architecture names with the number of instructions measured on each.
pub fn summarize(document: &Document) -> Vec<(String, usize)> {
    document
        .architectures()
        .into_iter()
        .map(|arch| {
            let count = document
                .instructions
                .iter()
                .filter(|i| i.architecture(&arch).is_some())
                .count();
            (arch, count)
        })
        .collect()
}

/// Print every architecture of the document, one per line.
pub fn run(document_path: &Path) -> Result<()> {
    let document = load_document(document_path)
        .with_context(|| format!("failed to read {}", document_path.display()))?;
    for (arch, count) in summarize(&document) {
        println!("{arch:<8} {count} instruction(s)");
    }
    Ok(())
}
