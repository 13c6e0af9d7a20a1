//! Instruction measurement documents.
//!
//! Reads the per-instruction measurement data the model importer works from:
//! operand records, hardware measurements with port counters and latency
//! samples, and versioned analyzer-tool records. Two encodings are accepted:
//! the uops.info XML layout and a JSON rendering of the same model.

pub mod error;
pub mod model;
pub mod version;
pub mod xml;

use std::path::Path;

pub use error::{DocumentError, Result};
pub use model::{
    AnalyzerRecord, ArchitectureBlock, Attributes, Document, Instruction, LatencySample,
    Measurement, Operand,
};
pub use version::ToolVersion;
pub use xml::parse_xml;

/// Parse a document from its JSON rendering.
pub fn parse_json(text: &str) -> Result<Document> {
    Ok(serde_json::from_str(text)?)
}

/// Render a document as pretty JSON.
pub fn to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Load a document from disk.
///
/// Files ending in `.json` are read as JSON; everything else as XML.
pub fn load_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let document = if is_json {
        parse_json(&text)?
    } else {
        parse_xml(&text)?
    };
    log::info!(
        "loaded {} instruction(s) from {}",
        document.instructions.len(),
        path.display()
    );
    Ok(document)
}
