//! Instruction port models from raw measurements.
//!
//! Converts per-instruction measurement records into model tables: for every
//! instruction form on an architecture, a throughput, a latency and a
//! per-port occupancy vector. The pipeline, leaf-first:
//!
//! - **param / registers:** operand records to parameter tokens
//! - **occupancy:** port counters to occupancy vectors
//! - **reconcile:** many measurement and analyzer records to one timing
//! - **variants:** one measured form to its equivalent spellings
//! - **builder:** all of the above over a document, per architecture
//! - **render:** model tables to the scheduler's text format

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod occupancy;
pub mod param;
pub mod reconcile;
pub mod registers;
pub mod render;
pub mod variants;

pub use builder::{
    build_model, BuildOptions, BuildOutput, BuildStats, ModelEntry, ModelTable, OperandErrorPolicy,
};
pub use diagnostics::{Diagnostic, OccupancySource};
pub use error::{ModelError, Result};
pub use occupancy::{occupancy_from_attributes, PortOccupancy, DIVIDER_PORT};
pub use param::{extract_parameters, format_signature, OperandKind, ParamClass, ParamToken};
pub use reconcile::{reconcile, Reconciliation, Timing};
pub use registers::{RegisterClass, RegisterInfo};
pub use render::{extend_port_columns, render_table, HEADER};
pub use variants::{expand_variants, Variant};
