//! TOML parsing, serialization, validation, and discovery for port-layout files.
//!
//! Layout files are named `<anything>.ports.toml` and hold an array of
//! `[[layout]]` tables. They extend or override the built-in layouts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::layout::{LayoutTable, PortLayout};

/// File suffix recognised by [`discover_layouts`].
pub const LAYOUT_FILE_SUFFIX: &str = ".ports.toml";

/// On-disk shape of a layout file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFile {
    #[serde(default, rename = "layout")]
    pub layouts: Vec<PortLayout>,
}

/// A validation issue found in a layout definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

fn read_layout_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Load layouts from a `.ports.toml` file.
pub fn load_layouts_toml(path: &Path) -> Result<Vec<PortLayout>> {
    parse_layouts_toml(&read_layout_file(path)?)
}

/// Load layouts from a `.ports.toml` file without validating them.
///
/// Only TOML syntax and field types are checked. Use [`validate_layout`]
/// to inspect the result.
pub fn load_layouts_unchecked(path: &Path) -> Result<Vec<PortLayout>> {
    let file: LayoutFile = toml::from_str(&read_layout_file(path)?)?;
    Ok(file.layouts)
}

/// Parse layouts from a TOML string.
///
/// Every parsed layout must pass [`validate_layout`] without errors;
/// warnings are logged.
pub fn parse_layouts_toml(toml_str: &str) -> Result<Vec<PortLayout>> {
    let file: LayoutFile = toml::from_str(toml_str)?;
    for layout in &file.layouts {
        if let Err(issues) = validate_layout(layout) {
            let mut errors = Vec::new();
            for issue in issues {
                if issue.severity == "error" {
                    errors.push(issue.message);
                } else {
                    log::warn!("layout '{}': {}", layout.name, issue.message);
                }
            }
            if !errors.is_empty() {
                return Err(TargetError::Validation {
                    name: layout.name.clone(),
                    detail: errors.join("; "),
                });
            }
        }
    }
    Ok(file.layouts)
}

/// Serialize layouts to pretty TOML.
pub fn layouts_to_toml(layouts: &[PortLayout]) -> Result<String> {
    let file = LayoutFile {
        layouts: layouts.to_vec(),
    };
    let toml_str = toml::to_string_pretty(&file)?;
    Ok(toml_str)
}

/// Validate a layout definition for structural correctness.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
pub fn validate_layout(layout: &PortLayout) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if layout.name.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "layout has an empty architecture name".into(),
        });
    }

    if layout.port_count == 0 {
        issues.push(ValidationIssue {
            severity: "error",
            message: "port count is 0".into(),
        });
    }

    let mut seen = BTreeSet::new();
    for port in &layout.pipeline_ports {
        if port.is_empty() {
            issues.push(ValidationIssue {
                severity: "error",
                message: "empty pipeline port identifier".into(),
            });
            continue;
        }
        if !seen.insert(port.as_str()) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("pipeline port '{port}' listed twice"),
            });
        }
        // Numbered columns are synthesized from the port count.
        if port.chars().all(|c| c.is_ascii_digit()) {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!(
                    "pipeline port '{port}' is numeric and collides with execution port numbering"
                ),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Discover all `.ports.toml` files in a directory.
///
/// Returns the paths sorted by file name.
pub fn discover_layouts(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_layout = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(LAYOUT_FILE_SUFFIX));
        if is_layout {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Build the layout table from the built-ins plus the given files or directories.
///
/// Directories are searched with [`discover_layouts`]; later sources
/// override earlier ones by architecture name.
pub fn load_layout_table(sources: &[PathBuf]) -> Result<LayoutTable> {
    let mut table = LayoutTable::builtin();
    for source in sources {
        let files = if source.is_dir() {
            discover_layouts(source)?
        } else {
            vec![source.clone()]
        };
        for file in files {
            let layouts = load_layouts_toml(&file)?;
            log::info!("loaded {} port layout(s) from {}", layouts.len(), file.display());
            table.extend(layouts);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::builtin_layouts;

    #[test]
    fn round_trip_builtins() {
        let original = builtin_layouts();
        let toml_str = layouts_to_toml(&original).unwrap();
        let parsed = parse_layouts_toml(&toml_str).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
[[layout]]
name = "ICL"
port-count = 10
pipeline-ports = ["0DV"]

[[layout]]
name = "A64FX"
port-count = 8
"#;
        let layouts = parse_layouts_toml(toml_str).unwrap();
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].name, "ICL");
        assert_eq!(layouts[0].required_columns(), 11);
        assert!(layouts[1].pipeline_ports.is_empty());
        assert!(layouts[1].description.is_none());
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_layouts_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn parse_missing_field_returns_error() {
        let toml_str = r#"
[[layout]]
name = "incomplete"
"#;
        assert!(matches!(
            parse_layouts_toml(toml_str).unwrap_err(),
            TargetError::Toml(_)
        ));
    }

    #[test]
    fn parse_rejects_zero_ports() {
        let toml_str = r#"
[[layout]]
name = "NOPE"
port-count = 0
"#;
        let err = parse_layouts_toml(toml_str).unwrap_err();
        assert!(matches!(err, TargetError::Validation { ref name, .. } if name == "NOPE"));
    }

    #[test]
    fn validate_builtins() {
        for layout in builtin_layouts() {
            assert!(validate_layout(&layout).is_ok(), "{}", layout.name);
        }
    }

    #[test]
    fn validate_duplicate_pipeline_port() {
        let layout = PortLayout::new("SKL", 8, &["0DV", "0DV"]);
        let issues = validate_layout(&layout).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("listed twice")));
    }

    #[test]
    fn validate_numeric_pipeline_port_is_warning() {
        let layout = PortLayout::new("SKL", 8, &["9"]);
        let issues = validate_layout(&layout).unwrap_err();
        assert!(issues.iter().all(|i| i.severity == "warning"));
        // Warnings alone do not reject the file.
        let toml_str = layouts_to_toml(&[layout]).unwrap();
        assert!(parse_layouts_toml(&toml_str).is_ok());
    }

    #[test]
    fn discover_finds_layout_files() {
        let dir = tempfile::tempdir().unwrap();
        let body = layouts_to_toml(&builtin_layouts()).unwrap();
        std::fs::write(dir.path().join("intel.ports.toml"), &body).unwrap();
        std::fs::write(dir.path().join("amd.ports.toml"), &body).unwrap();
        std::fs::write(dir.path().join("notes.toml"), "ignore me").unwrap();

        let found = discover_layouts(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("amd.ports.toml"));
        assert!(found[1].ends_with("intel.ports.toml"));
    }

    #[test]
    fn discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_layouts(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn unchecked_load_keeps_invalid_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ports.toml");
        std::fs::write(&path, "[[layout]]\nname = \"ICL\"\nport-count = 0\n").unwrap();
        assert!(load_layouts_toml(&path).is_err());
        let layouts = load_layouts_unchecked(&path).unwrap();
        assert_eq!(layouts[0].port_count, 0);
    }

    #[test]
    fn load_not_found() {
        let result = load_layouts_toml(Path::new("/nonexistent/x.ports.toml"));
        assert!(matches!(result.unwrap_err(), TargetError::NotFound { .. }));
    }

    #[test]
    fn table_from_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ports.toml");
        let body = layouts_to_toml(&[PortLayout::new("SKL", 12, &[])]).unwrap();
        std::fs::write(&path, body).unwrap();

        let table = load_layout_table(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(table.get("SKL").unwrap().required_columns(), 12);
        assert_eq!(table.get("HSW").unwrap().required_columns(), 9);
    }
}
