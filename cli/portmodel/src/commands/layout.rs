//! `portmodel layout`: inspect and validate port layouts.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use portmodel_targets::{
    layouts_to_toml, load_layout_table, load_layouts_unchecked, validate_layout, PortLayout,
};

/// List all known layouts.
pub fn list(sources: &[PathBuf]) -> Result<()> {
    let table = load_layout_table(sources)?;
    println!("Port layouts:");
    println!();
    for layout in table.iter() {
        println!(
            "  {:<8} {:>2} ports {:<10} {}",
            layout.name,
            layout.port_count,
            pipeline_label(layout),
            layout.description.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("Use 'portmodel layout describe <name>' for details.");
    Ok(())
}

fn pipeline_label(layout: &PortLayout) -> String {
    if layout.pipeline_ports.is_empty() {
        String::new()
    } else {
        format!("+{}", layout.pipeline_ports.join(","))
    }
}

/// Describe one layout, as text or TOML.
pub fn describe(name: &str, sources: &[PathBuf], format: Option<&str>) -> Result<()> {
    let table = load_layout_table(sources)?;
    let Some(layout) = table.get(name) else {
        bail!("unknown layout: '{name}'. Use 'portmodel layout list' to see available layouts.");
    };

    match format {
        Some("toml") => print!("{}", layouts_to_toml(std::slice::from_ref(layout))?),
        Some(other) => bail!("unknown format '{other}' (expected 'toml')"),
        None => {
            println!("=== Layout: {} ===", layout.name);
            if let Some(description) = &layout.description {
                println!("Description:    {description}");
            }
            println!("Ports:          {}", layout.port_count);
            println!("Pipeline ports: {}", layout.pipeline_ports.join(", "));
            println!("Table columns:  {}", layout.required_columns());
        }
    }
    Ok(())
}

/// One line per issue of every layout, and the number of errors among them.
fn validation_report(layouts: &[PortLayout]) -> (Vec<String>, usize) {
    let mut lines = Vec::new();
    let mut errors = 0;
    for layout in layouts {
        match validate_layout(layout) {
            Ok(()) => lines.push(format!("{}: ok", layout.name)),
            Err(issues) => {
                for issue in issues {
                    if issue.severity == "error" {
                        errors += 1;
                    }
                    lines.push(format!("{}: {}: {}", layout.name, issue.severity, issue.message));
                }
            }
        }
    }
    (lines, errors)
}

/// Validate a layout file, printing every issue found.
///
/// Fails if any layout has an error-severity issue.
pub fn validate(path: &Path) -> Result<()> {
    let layouts = load_layouts_unchecked(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let (lines, errors) = validation_report(&layouts);
    for line in &lines {
        println!("{line}");
    }
    println!("{} layout(s) in {}", layouts.len(), path.display());
    if errors > 0 {
        bail!("{errors} error(s) in {}", path.display());
    }
    Ok(())
}
