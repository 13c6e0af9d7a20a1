//! In-memory measurement document.
//!
//! Mirrors the uops.info layout: instructions carry operand records and
//! per-architecture blocks; each block holds hardware measurements and
//! analyzer-tool records. Attribute maps are kept verbatim so downstream
//! stages decide which keys matter.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::version::ToolVersion;

/// Flat attribute map of one record.
pub type Attributes = BTreeMap<String, String>;

/// A complete measurement document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Document {
    pub instructions: Vec<Instruction>,
}

impl Document {
    /// Sorted set of every architecture name mentioned in the document.
    pub fn architectures(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .flat_map(|i| i.architectures.iter().map(|a| a.name.clone()))
            .collect()
    }
}

/// One instruction form as listed in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Instruction {
    /// Assembly mnemonic (`asm` attribute).
    pub asm: String,
    #[serde(default)]
    pub operands: Vec<Operand>,
    #[serde(default)]
    pub architectures: Vec<ArchitectureBlock>,
}

impl Instruction {
    /// The first block recorded for `arch`, if any.
    pub fn architecture(&self, arch: &str) -> Option<&ArchitectureBlock> {
        self.architectures.iter().find(|a| a.name == arch)
    }
}

/// One operand record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Operand {
    /// Declared position; operands are processed in ascending order of this.
    pub idx: u32,
    /// Raw type tag (`imm`, `mem`, `reg`, `relbr`, `agen`, ...).
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Raw text content (the register alternatives for `reg`).
    #[serde(default)]
    pub text: String,
    /// Implicit operands that do not appear in assembly syntax.
    #[serde(default)]
    pub suppressed: bool,
}

/// Everything recorded for one instruction on one architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchitectureBlock {
    pub name: String,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub analyzer_records: Vec<AnalyzerRecord>,
}

/// A direct hardware measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Measurement {
    /// Counters and derived figures (`port015`, `div_cycles`, `TP`, ...).
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub latencies: Vec<LatencySample>,
}

/// One latency sub-path of a measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LatencySample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_op: Option<String>,
    /// Explicit cycle count; samples without one are bounds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<u32>,
    /// Remaining attributes (`cycles_mem`, `upper_bound`, ...).
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub extra: Attributes,
}

/// A record produced by a static analyzer tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnalyzerRecord {
    pub version: ToolVersion,
    #[serde(default)]
    pub attributes: Attributes,
}
