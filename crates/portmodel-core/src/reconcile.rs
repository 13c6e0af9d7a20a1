//! Measurement reconciliation.
//!
//! One instruction on one architecture may carry several hardware
//! measurements and several analyzer-tool records. Reconciliation folds them
//! into a single latency and a single occupancy vector:
//!
//! 1. Latency samples with an explicit cycle count are checked per
//!    measurement. The last measurement with samples sets the latency; if
//!    any measurement disagrees with itself the latency is left unset.
//! 2. Occupancy vectors are ordered measurements first (document order), then
//!    analyzer records by ascending tool version. The last one is
//!    authoritative; disagreement is reported but does not stop the fold.
//! 3. No vectors at all means no timing for this architecture.

use portmodel_doc::ArchitectureBlock;

use crate::diagnostics::{Diagnostic, OccupancySource};
use crate::error::Result;
use crate::occupancy::{occupancy_from_attributes, PortOccupancy};

/// Reconciled timing of one instruction on one architecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub latency: Option<u32>,
    pub occupancy: PortOccupancy,
    /// Always `occupancy.throughput()`.
    pub throughput: f64,
    /// Source of the authoritative vector.
    pub source: OccupancySource,
}

/// Result of reconciling one architecture block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciliation {
    /// `None` when the block has no occupancy data.
    pub timing: Option<Timing>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fold all records of `block` into one timing.
pub fn reconcile(mnemonic: &str, block: &ArchitectureBlock) -> Result<Reconciliation> {
    let arch = block.name.as_str();
    let mut diagnostics = Vec::new();

    let latency = reconcile_latency(mnemonic, block, &mut diagnostics);

    let mut analyzer: Vec<_> = block.analyzer_records.iter().collect();
    // Stable: equal versions keep document order.
    analyzer.sort_by(|a, b| a.version.cmp(&b.version));

    let mut vectors: Vec<(OccupancySource, PortOccupancy)> = Vec::new();
    for (n, measurement) in block.measurements.iter().enumerate() {
        let occupancy = occupancy_from_attributes(&measurement.attributes, arch)
            .map_err(|e| e.in_record(mnemonic, arch))?;
        vectors.push((OccupancySource::Measurement(n), occupancy));
    }
    for record in analyzer {
        let occupancy = occupancy_from_attributes(&record.attributes, arch)
            .map_err(|e| e.in_record(mnemonic, arch))?;
        vectors.push((OccupancySource::Analyzer(record.version.clone()), occupancy));
    }

    let Some((source, occupancy)) = vectors.last().cloned() else {
        return Ok(Reconciliation {
            timing: None,
            diagnostics,
        });
    };

    if vectors.iter().any(|(_, v)| *v != occupancy) {
        diagnostics.push(Diagnostic::ContradictoryPorts {
            mnemonic: mnemonic.to_string(),
            arch: arch.to_string(),
            sources: vectors.len(),
            chosen: source.clone(),
        });
    }

    let throughput = occupancy.throughput();
    Ok(Reconciliation {
        timing: Some(Timing {
            latency,
            occupancy,
            throughput,
            source,
        }),
        diagnostics,
    })
}

/// Latency of a block: the common sample value of the last measurement that
/// has any. A measurement whose own samples disagree unsets it for good.
fn reconcile_latency(
    mnemonic: &str,
    block: &ArchitectureBlock,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<u32> {
    let mut latency = None;
    let mut contradicted = false;
    for measurement in &block.measurements {
        let samples: Vec<u32> = measurement.latencies.iter().filter_map(|l| l.cycles).collect();
        match samples.split_first() {
            None => {}
            Some((first, rest)) if rest.iter().all(|s| s == first) => latency = Some(*first),
            Some(_) => {
                contradicted = true;
                diagnostics.push(Diagnostic::ContradictoryLatency {
                    mnemonic: mnemonic.to_string(),
                    arch: block.name.clone(),
                    samples,
                });
            }
        }
    }
    if contradicted {
        None
    } else {
        latency
    }
}
