//! Execution-port layouts.
//!
//! Each layout mirrors what the downstream scheduler declares for one
//! architecture: how many numbered execution ports it simulates and which
//! extra pipeline-only ports (such as the divider) it tracks on the side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Port layout of one architecture as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortLayout {
    /// Architecture abbreviation (e.g., "SKL", "ZEN").
    pub name: String,
    /// Number of numbered execution ports.
    pub port_count: u32,
    /// Pipeline-only ports tracked in addition to the numbered ones.
    #[serde(default)]
    pub pipeline_ports: Vec<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PortLayout {
    /// Create a layout with the given numbered ports and pipeline ports.
    pub fn new(name: impl Into<String>, port_count: u32, pipeline_ports: &[&str]) -> Self {
        Self {
            name: name.into(),
            port_count,
            pipeline_ports: pipeline_ports.iter().map(|p| (*p).to_string()).collect(),
            description: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Total number of port columns a model table for this layout needs.
    pub fn required_columns(&self) -> usize {
        self.port_count as usize + self.pipeline_ports.len()
    }
}

/// Name-indexed collection of port layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutTable {
    layouts: BTreeMap<String, PortLayout>,
}

impl LayoutTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of the layouts known out of the box.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for layout in builtin_layouts() {
            table.insert(layout);
        }
        table
    }

    /// Insert a layout, replacing any previous layout of the same name.
    ///
    /// Returns the replaced layout, if any.
    pub fn insert(&mut self, layout: PortLayout) -> Option<PortLayout> {
        self.layouts.insert(layout.name.clone(), layout)
    }

    /// Merge every layout of `other` into this table, overriding by name.
    pub fn extend(&mut self, other: impl IntoIterator<Item = PortLayout>) {
        for layout in other {
            if let Some(previous) = self.insert(layout) {
                log::debug!("port layout '{}' overridden", previous.name);
            }
        }
    }

    /// Look up the layout of an architecture.
    pub fn get(&self, name: &str) -> Option<&PortLayout> {
        self.layouts.get(name)
    }

    /// Iterate over layouts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &PortLayout> {
        self.layouts.values()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Layouts of the Intel and AMD cores the scheduler ships with.
pub fn builtin_layouts() -> Vec<PortLayout> {
    vec![
        PortLayout::new("SNB", 6, &["0DV"]).with_description("Intel Sandy Bridge"),
        PortLayout::new("IVB", 6, &["0DV"]).with_description("Intel Ivy Bridge"),
        PortLayout::new("HSW", 8, &["0DV"]).with_description("Intel Haswell"),
        PortLayout::new("BDW", 8, &["0DV"]).with_description("Intel Broadwell"),
        PortLayout::new("SKL", 8, &["0DV"]).with_description("Intel Skylake"),
        PortLayout::new("SKX", 8, &["0DV"]).with_description("Intel Skylake-SP"),
        PortLayout::new("ZEN", 10, &["3DV"]).with_description("AMD Zen"),
    ]
}
