//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with the operating system. Implementations live in `adapters`.

mod probe;
mod process_table;
mod signal;

pub use probe::PortProbe;
pub use process_table::ProcessTable;
pub use signal::SignalSender;
