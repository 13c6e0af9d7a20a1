//! Model table construction.
//!
//! Drives normalization, reconciliation and variant expansion over every
//! instruction of a document for one architecture.

use std::fmt;
use std::str::FromStr;

use portmodel_doc::Document;

use crate::diagnostics::Diagnostic;
use crate::error::{ModelError, Result};
use crate::occupancy::PortOccupancy;
use crate::param::{extract_parameters, format_signature, ParamToken};
use crate::reconcile::reconcile;
use crate::variants::expand_variants;

/// What to do with an instruction whose operands cannot be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandErrorPolicy {
    /// Leave the instruction out of the table.
    #[default]
    Drop,
    /// Keep the instruction with an empty parameter signature.
    EmptyParameters,
}

impl FromStr for OperandErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "drop" => Ok(OperandErrorPolicy::Drop),
            "empty" => Ok(OperandErrorPolicy::EmptyParameters),
            other => Err(format!(
                "unknown operand error policy '{other}' (expected 'drop' or 'empty')"
            )),
        }
    }
}

/// Options for [`build_model`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub on_operand_error: OperandErrorPolicy,
}

/// One row of a model table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    /// Uppercase mnemonic, possibly suffixed by variant expansion.
    pub mnemonic: String,
    pub parameters: Vec<ParamToken>,
    /// Always `occupancy.throughput()`.
    pub throughput: f64,
    pub latency: Option<u32>,
    pub occupancy: PortOccupancy,
}

impl ModelEntry {
    /// Row key as written in the table (`movl-r32_r32`).
    pub fn instruction_form(&self) -> String {
        format!(
            "{}-{}",
            self.mnemonic.to_lowercase(),
            format_signature(&self.parameters)
        )
    }
}

/// All entries of one architecture, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelTable {
    pub arch: String,
    pub entries: Vec<ModelEntry>,
}

impl ModelTable {
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters collected while building a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Instructions in the document.
    pub instructions: usize,
    /// Instructions with no block for the architecture.
    pub absent: usize,
    /// Instructions whose block had no occupancy data.
    pub no_data: usize,
    pub operand_failures: usize,
    pub latency_contradictions: usize,
    pub port_contradictions: usize,
    /// Instructions that produced at least one row.
    pub modeled: usize,
    pub rows: usize,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows from {}/{} instructions ({} absent, {} without data, {} operand failures, \
             {} latency and {} port contradictions)",
            self.rows,
            self.modeled,
            self.instructions,
            self.absent,
            self.no_data,
            self.operand_failures,
            self.latency_contradictions,
            self.port_contradictions
        )
    }
}

/// A built table with everything reported along the way.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub table: ModelTable,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: BuildStats,
}

/// Build the model table of `arch` from `document`.
///
/// Diagnostics are logged as they occur and also returned. Only malformed
/// counters are errors.
pub fn build_model(document: &Document, arch: &str, options: &BuildOptions) -> Result<BuildOutput> {
    let mut output = BuildOutput {
        table: ModelTable::new(arch),
        ..BuildOutput::default()
    };
    let stats = &mut output.stats;

    for instruction in &document.instructions {
        stats.instructions += 1;
        let mnemonic = instruction.asm.as_str();

        let Some(block) = instruction.architecture(arch) else {
            stats.absent += 1;
            continue;
        };

        let parameters = match extract_parameters(&instruction.operands) {
            Ok(parameters) => parameters,
            Err(err) => {
                stats.operand_failures += 1;
                let detail = match err {
                    ModelError::UnrecognizedOperand { detail } => detail,
                    other => other.to_string(),
                };
                let diagnostic = Diagnostic::UnrecognizedOperand {
                    mnemonic: mnemonic.to_string(),
                    arch: arch.to_string(),
                    detail,
                };
                diagnostic.emit();
                output.diagnostics.push(diagnostic);
                match options.on_operand_error {
                    OperandErrorPolicy::Drop => continue,
                    OperandErrorPolicy::EmptyParameters => Vec::new(),
                }
            }
        };

        let reconciliation = reconcile(mnemonic, block)?;
        for diagnostic in reconciliation.diagnostics {
            match diagnostic {
                Diagnostic::ContradictoryLatency { .. } => stats.latency_contradictions += 1,
                Diagnostic::ContradictoryPorts { .. } => stats.port_contradictions += 1,
                Diagnostic::UnrecognizedOperand { .. } => {}
            }
            diagnostic.emit();
            output.diagnostics.push(diagnostic);
        }

        let Some(timing) = reconciliation.timing else {
            log::debug!("no port data for {mnemonic} on {arch}");
            stats.no_data += 1;
            continue;
        };

        stats.modeled += 1;
        for variant in expand_variants(mnemonic, &parameters) {
            output.table.entries.push(ModelEntry {
                mnemonic: variant.mnemonic,
                parameters: variant.parameters,
                throughput: timing.throughput,
                latency: timing.latency,
                occupancy: timing.occupancy.clone(),
            });
        }
    }

    output.stats.rows = output.table.len();
    log::info!("{arch}: {}", output.stats);
    Ok(output)
}
