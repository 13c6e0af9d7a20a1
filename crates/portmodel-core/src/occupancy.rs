//! Port occupancy vectors.
//!
//! A measurement reports µop counts per *set* of candidate ports
//! (`port0156="1"`: one µop that may issue on 0, 1, 5 or 6). The model
//! assumes even distribution, so each candidate port is charged an equal
//! share of the count.

use std::collections::BTreeMap;

use portmodel_doc::Attributes;

use crate::error::{ModelError, Result};

/// Synthetic port charged with divider-pipeline cycles.
pub const DIVIDER_PORT: &str = "0DV";

const COUNTER_PREFIX: &str = "port";
const DIVIDER_ATTRIBUTE: &str = "div_cycles";

/// Architectures whose port 7 only does simple address generation. A
/// counter over exactly "237" is treated as one over "23" there.
pub const STORE_AGU_ALIAS_ARCHS: [&str; 4] = ["HSW", "BDW", "SKL", "SKX"];

/// Cycles per port identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortOccupancy {
    ports: BTreeMap<String, f64>,
}

impl PortOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupancy of one port, if the port is present.
    pub fn get(&self, port: &str) -> Option<f64> {
        self.ports.get(port).copied()
    }

    /// Add cycles to a port.
    pub fn charge(&mut self, port: impl Into<String>, cycles: f64) {
        *self.ports.entry(port.into()).or_insert(0.0) += cycles;
    }

    /// Set a port to an exact value.
    pub fn set(&mut self, port: impl Into<String>, cycles: f64) {
        self.ports.insert(port.into(), cycles);
    }

    /// Ports in ascending lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ports.iter().map(|(p, c)| (p.as_str(), *c))
    }

    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Cycles of the bottleneck port; 0.0 for an empty vector.
    pub fn throughput(&self) -> f64 {
        self.ports.values().copied().fold(0.0, f64::max)
    }

    /// Copy of this vector with every port of `columns` present, unseen ones at 0.0.
    pub fn densify<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> PortOccupancy {
        let mut dense = self.clone();
        for column in columns {
            dense.ports.entry(column.to_string()).or_insert(0.0);
        }
        dense
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PortOccupancy {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            ports: iter.into_iter().map(|(p, c)| (p.into(), c)).collect(),
        }
    }
}

/// Candidate ports of a counter attribute (`port015` → `"015"`).
fn counter_ports(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(COUNTER_PREFIX)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn parse_count(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| ModelError::InvalidCounter {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Derive the occupancy vector of one measurement or analyzer record.
pub fn occupancy_from_attributes(attributes: &Attributes, arch: &str) -> Result<PortOccupancy> {
    let collapse_port7 = STORE_AGU_ALIAS_ARCHS.contains(&arch);
    let mut occupancy = PortOccupancy::new();

    for (key, value) in attributes {
        let Some(mut ports) = counter_ports(key) else {
            continue;
        };
        if collapse_port7 && ports == "237" {
            ports = "23";
        }
        let count = parse_count(key, value)?;
        let share = f64::from(count) / ports.len() as f64;
        for port in ports.chars() {
            occupancy.charge(port.to_string(), share);
        }
    }

    if let Some(value) = attributes.get(DIVIDER_ATTRIBUTE) {
        let cycles = parse_count(DIVIDER_ATTRIBUTE, value)?;
        occupancy.set(DIVIDER_PORT, f64::from(cycles));
    }

    Ok(occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn counter_is_split_evenly() {
        let occ = occupancy_from_attributes(&attrs(&[("port23", "2")]), "SNB").unwrap();
        assert_eq!(occ.get("2"), Some(1.0));
        assert_eq!(occ.get("3"), Some(1.0));
        assert_eq!(occ.len(), 2);
    }

    #[test]
    fn shares_accumulate_across_counters() {
        let occ = occupancy_from_attributes(
            &attrs(&[("port0156", "1"), ("port06", "1"), ("port1", "1")]),
            "SKL",
        )
        .unwrap();
        assert_eq!(occ.get("0"), Some(0.75));
        assert_eq!(occ.get("1"), Some(1.25));
        assert_eq!(occ.get("5"), Some(0.25));
        assert_eq!(occ.get("6"), Some(0.75));
    }

    #[test]
    fn port7_collapses_on_skylake() {
        let occ = occupancy_from_attributes(&attrs(&[("port237", "2")]), "SKL").unwrap();
        assert_eq!(occ.get("2"), Some(1.0));
        assert_eq!(occ.get("3"), Some(1.0));
        assert_eq!(occ.get("7"), None);
    }

    #[test]
    fn port7_kept_elsewhere() {
        let occ = occupancy_from_attributes(&attrs(&[("port237", "3")]), "ICL").unwrap();
        assert_eq!(occ.get("7"), Some(1.0));
        // Only exactly "237" collapses.
        let occ = occupancy_from_attributes(&attrs(&[("port2347", "4")]), "HSW").unwrap();
        assert_eq!(occ.get("7"), Some(1.0));
    }

    #[test]
    fn divider_cycles_are_not_split() {
        let occ = occupancy_from_attributes(
            &attrs(&[("port0", "1"), ("div_cycles", "6")]),
            "SKL",
        )
        .unwrap();
        assert_eq!(occ.get(DIVIDER_PORT), Some(6.0));
        assert_eq!(occ.get("0"), Some(1.0));
        assert_eq!(occ.throughput(), 6.0);
    }

    #[test]
    fn unrelated_attributes_ignored() {
        let occ = occupancy_from_attributes(
            &attrs(&[("TP", "0.25"), ("uops", "1"), ("ports", "1*p0156"), ("version", "2.1")]),
            "SKL",
        )
        .unwrap();
        assert!(occ.is_empty());
        assert_eq!(occ.throughput(), 0.0);
    }

    #[test]
    fn leading_digit_run_names_the_ports() {
        assert_eq!(counter_ports("port015"), Some("015"));
        assert_eq!(counter_ports("port23_fused"), Some("23"));
        assert_eq!(counter_ports("ports"), None);
        assert_eq!(counter_ports("port"), None);
        assert_eq!(counter_ports("xport0"), None);
    }

    #[test]
    fn non_integer_counter_is_an_error() {
        let err = occupancy_from_attributes(&attrs(&[("port0", "0.5")]), "SKL").unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidCounter {
                key: "port0".into(),
                value: "0.5".into()
            }
        );
    }

    #[test]
    fn throughput_is_max_port() {
        let occ: PortOccupancy = [("0", 0.5), ("1", 1.5), ("5", 1.0)].into_iter().collect();
        assert_eq!(occ.throughput(), 1.5);
        assert_eq!(PortOccupancy::new().throughput(), 0.0);
    }

    #[test]
    fn densify_fills_missing_ports() {
        let occ: PortOccupancy = [("0", 1.0)].into_iter().collect();
        let dense = occ.densify(["0", "1", "0DV"]);
        let cols: Vec<_> = dense.iter().collect();
        assert_eq!(cols, [("0", 1.0), ("0DV", 0.0), ("1", 0.0)]);
    }
}
