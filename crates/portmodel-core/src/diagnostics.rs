//! Data-quality reports.
//!
//! Diagnostics never stop a run. They are logged at `warn` as they are
//! produced and handed back to the caller for summaries and tests.

use std::fmt;

use portmodel_doc::ToolVersion;

/// Where a port-occupancy vector came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccupancySource {
    /// The n-th hardware measurement of the block (document order).
    Measurement(usize),
    /// An analyzer-tool record.
    Analyzer(ToolVersion),
}

impl fmt::Display for OccupancySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupancySource::Measurement(n) => write!(f, "measurement #{n}"),
            OccupancySource::Analyzer(version) => write!(f, "IACA {version}"),
        }
    }
}

/// A recoverable problem found while building a model table.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Latency samples disagree; latency left unset.
    ContradictoryLatency {
        mnemonic: String,
        arch: String,
        samples: Vec<u32>,
    },
    /// Occupancy sources disagree; the last one in priority order was used.
    ContradictoryPorts {
        mnemonic: String,
        arch: String,
        sources: usize,
        chosen: OccupancySource,
    },
    /// Operands could not be normalized.
    UnrecognizedOperand {
        mnemonic: String,
        arch: String,
        detail: String,
    },
}

impl Diagnostic {
    /// Write the diagnostic to the log channel.
    pub fn emit(&self) {
        log::warn!("{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ContradictoryLatency {
                mnemonic,
                arch,
                samples,
            } => write!(
                f,
                "contradicting latencies for {mnemonic} on {arch}: {samples:?}; latency left unset"
            ),
            Diagnostic::ContradictoryPorts {
                mnemonic,
                arch,
                sources,
                chosen,
            } => write!(
                f,
                "contradicting port occupancies for {mnemonic} on {arch} across {sources} sources; using {chosen}"
            ),
            Diagnostic::UnrecognizedOperand {
                mnemonic,
                arch,
                detail,
            } => write!(f, "{mnemonic} on {arch}: {detail}"),
        }
    }
}
