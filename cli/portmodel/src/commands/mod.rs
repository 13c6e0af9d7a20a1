//! CLI command implementations.

pub mod archs;
pub mod extract;
pub mod layout;
