//! Execution-port layouts for the portmodel pipeline.
//!
//! The scheduler that consumes model tables simulates a fixed set of
//! execution ports per architecture. This crate describes those sets so the
//! table serializer knows how many port columns every row must carry:
//! - **Built-in layouts:** the Intel and AMD cores the scheduler supports
//! - **Layout files:** `.ports.toml` files that add or override layouts

pub mod error;
pub mod layout;
pub mod parse;

pub use error::{Result, TargetError};
pub use layout::{builtin_layouts, LayoutTable, PortLayout};
pub use parse::{
    discover_layouts, layouts_to_toml, load_layout_table, load_layouts_toml,
    load_layouts_unchecked, parse_layouts_toml, validate_layout, ValidationIssue,
};
