//! CLI command implementations.

pub mod kill;
pub mod list;
