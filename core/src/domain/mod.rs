//! Domain layer - Pure data models.
//!
//! These types have no I/O dependencies and can be tested in isolation.
//! Nothing here outlives a single scan or kill invocation.

mod port;
mod process;

// Re-export all domain types
pub use port::{BusyPorts, PortRange};
pub use process::{KillOutcome, PidReport, ProcessHandle, Signal};
