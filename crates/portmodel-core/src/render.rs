//! Tabular rendering of model tables.
//!
//! ```text
//! instr,TP,LT,ports
//! add-r64_r64,0.25,1,"(0.25,0.0,0.25,0.0,0.0,0.25,0.25,0.0,0.0)"
//! div-r32,6.0,None,"(6.0,6.0,1.0,0.0,0.0,1.0,2.0,0.0,0.0)"
//! ```
//!
//! Every row carries one value per port column, in ascending lexicographic
//! order of the port identifier (`0`, `0DV`, `1`, ...). The column set is the
//! union of all ports seen in the table, padded with synthesized numbered
//! ports up to what the architecture's layout declares.
//!
//! All occupancy and throughput values print as floats with at least one
//! fractional digit. This includes whole divider-pipeline cycle counts on
//! `0DV`, so a divider bottleneck reads `6.0` rather than `6`.

use std::collections::BTreeSet;

use portmodel_targets::PortLayout;

use crate::builder::{ModelEntry, ModelTable};

/// Header row of every table.
pub const HEADER: &str = "instr,TP,LT,ports";

/// Extend `known` port identifiers to at least `required` columns.
///
/// Known identifiers are sorted first. Each synthesized identifier is the
/// current maximum numeric identifier plus one, inserted right after that
/// maximum. Non-numeric identifiers (such as `0DV`) are skipped when
/// looking for the maximum; with no numeric identifier present at all, `0`
/// onwards are appended at the end.
pub fn extend_port_columns<'a>(
    known: impl IntoIterator<Item = &'a str>,
    required: usize,
) -> Vec<String> {
    let mut columns: Vec<String> = known
        .into_iter()
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    while columns.len() < required {
        let max = columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.parse::<u32>().ok().map(|n| (n, i)))
            .max_by_key(|&(n, _)| n);
        match max {
            Some((n, position)) => columns.insert(position + 1, (n + 1).to_string()),
            None => {
                // Keep going from "0" if a synthesized id is already there.
                let next = (0u32..)
                    .map(|n| n.to_string())
                    .find(|id| !columns.contains(id))
                    .unwrap_or_default();
                columns.push(next);
            }
        }
    }
    columns
}

/// Every port identifier used by any entry of the table.
pub fn used_ports(table: &ModelTable) -> BTreeSet<&str> {
    table
        .entries
        .iter()
        .flat_map(|e| e.occupancy.ports())
        .collect()
}

/// Format a cycle count with at least one fractional digit.
pub fn format_cycles(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_latency(latency: Option<u32>) -> String {
    match latency {
        Some(cycles) => cycles.to_string(),
        None => "None".to_string(),
    }
}

fn render_row(entry: &ModelEntry, columns: &[String]) -> String {
    let dense = entry.occupancy.densify(columns.iter().map(String::as_str));
    let values = dense
        .iter()
        .map(|(_, cycles)| format_cycles(cycles))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{},{},{},\"({values})\"",
        entry.instruction_form(),
        format_cycles(entry.throughput),
        format_latency(entry.latency)
    )
}

/// Render a table, padding port columns to `layout` when one is given.
pub fn render_table(table: &ModelTable, layout: Option<&PortLayout>) -> String {
    let required = match layout {
        Some(layout) => layout.required_columns(),
        None => {
            log::warn!(
                "no port layout for {}; port columns are not padded",
                table.arch
            );
            0
        }
    };
    let columns = extend_port_columns(used_ports(table), required);
    log::debug!("{}: {} port columns: {}", table.arch, columns.len(), columns.join(" "));

    let mut out = String::with_capacity(HEADER.len() + 1 + table.len() * 64);
    out.push_str(HEADER);
    out.push('\n');
    for entry in &table.entries {
        out.push_str(&render_row(entry, &columns));
        out.push('\n');
    }
    out
}
