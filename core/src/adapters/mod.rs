//! Adapters layer - Operating system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with the operating system.

pub mod probe;
pub mod process_table;
pub mod signal;

// Re-export main types for convenience
pub use probe::TcpBindProbe;
pub use process_table::PlatformProcessTable;
pub use signal::PlatformSignalSender;
