//! `portmodel extract`: build and write model tables.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use portmodel_core::{build_model, render_table, BuildOptions, OperandErrorPolicy};
use portmodel_doc::{load_document, Document};
use portmodel_targets::{load_layout_table, LayoutTable};

/// Settings shared by every architecture of one run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub layouts: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub on_operand_error: OperandErrorPolicy,
}

/// File name of the table written for `arch`.
pub fn table_file_name(arch: &str) -> String {
    format!("{arch}_data.csv")
}

/// Run the extraction.
///
/// With `arch`, the table of that architecture goes to stdout. Without it,
/// one table per architecture of the document is written to the output
/// directory.
pub fn run(document_path: &Path, arch: Option<&str>, options: &ExtractOptions) -> Result<()> {
    let layouts = load_layout_table(&options.layouts).context("failed to load port layouts")?;
    let document = load_document(document_path)
        .with_context(|| format!("failed to read {}", document_path.display()))?;
    let build_options = BuildOptions {
        on_operand_error: options.on_operand_error,
    };

    match arch {
        Some(arch) => {
            let table = render_arch(&document, arch, &layouts, &build_options)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(table.as_bytes())?;
            stdout.flush()?;
        }
        None => {
            let dir = options
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            let written = write_all_archs(&document, &dir, &layouts, &build_options)?;
            log::info!("wrote {} table(s) to {}", written.len(), dir.display());
        }
    }
    Ok(())
}

fn render_arch(
    document: &Document,
    arch: &str,
    layouts: &LayoutTable,
    build_options: &BuildOptions,
) -> Result<String> {
    let output = build_model(document, arch, build_options)
        .with_context(|| format!("failed to build model for {arch}"))?;
    if !output.diagnostics.is_empty() {
        log::warn!("{arch}: {} diagnostic(s)", output.diagnostics.len());
    }
    Ok(render_table(&output.table, layouts.get(arch)))
}

/// Write `<ARCH>_data.csv` for every architecture of the document.
///
/// Returns the written paths in architecture name order.
pub fn write_all_archs(
    document: &Document,
    dir: &Path,
    layouts: &LayoutTable,
    build_options: &BuildOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for arch in document.architectures() {
        let table = render_arch(document, &arch, layouts, build_options)?;
        let path = dir.join(table_file_name(&arch));
        fs::write(&path, table).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
