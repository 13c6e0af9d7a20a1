//! Analyzer-tool versions.
//!
//! Versions are dot-separated runs of non-negative integers ("2.1",
//! "3.0.1"). Trailing zero components carry no weight, so "2.0" and
//! "2.0.0" are the same version.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// A totally ordered analyzer-tool version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolVersion {
    text: String,
    components: Vec<u64>,
}

impl ToolVersion {
    /// The version as written in the document.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Significant numeric components (trailing zeros removed).
    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl FromStr for ToolVersion {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DocumentError::InvalidVersion(s.to_string()));
        }
        let mut components = text
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DocumentError::InvalidVersion(s.to_string()));
                }
                part.parse::<u64>()
                    .map_err(|_| DocumentError::InvalidVersion(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        while components.last() == Some(&0) {
            components.pop();
        }
        Ok(Self {
            text: text.to_string(),
            components,
        })
    }
}

impl TryFrom<String> for ToolVersion {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToolVersion> for String {
    fn from(version: ToolVersion) -> Self {
        version.text
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for ToolVersion {}

impl Hash for ToolVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ToolVersion {
    // Lexicographic over components; with trailing zeros trimmed a shorter
    // prefix is always the smaller version.
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ToolVersion {
        s.parse().unwrap()
    }

    #[test]
    fn numeric_not_lexical_ordering() {
        assert!(v("2.0") < v("2.1"));
        assert!(v("2.1") < v("2.10"));
        assert!(v("2.9") < v("2.10"));
        assert!(v("2.3") < v("3.0"));
    }

    #[test]
    fn trailing_zeros_are_insignificant() {
        assert_eq!(v("2.0"), v("2.0.0"));
        assert_eq!(v("3"), v("3.0"));
        assert!(v("2.0.0") < v("2.0.1"));
    }

    #[test]
    fn display_keeps_original_text() {
        assert_eq!(v("2.0.0").to_string(), "2.0.0");
        assert_eq!(v(" 3.0 ").as_str(), "3.0");
    }

    #[test]
    fn sorting_is_ascending() {
        let mut versions = vec![v("3.0"), v("2.1"), v("2.3"), v("2.0")];
        versions.sort();
        let texts: Vec<_> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(texts, ["2.0", "2.1", "2.3", "3.0"]);
    }

    #[test]
    fn malformed_versions_are_rejected() {
        for bad in ["", "2.", ".1", "2..1", "v2.1", "2.1b", "-1"] {
            assert!(bad.parse::<ToolVersion>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&v("2.2")).unwrap();
        assert_eq!(json, "\"2.2\"");
        let back: ToolVersion = serde_json::from_str("\"2.3\"").unwrap();
        assert_eq!(back, v("2.3"));
        assert!(serde_json::from_str::<ToolVersion>("\"x\"").is_err());
    }
}
