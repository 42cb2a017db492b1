//! Application layer - Use case services.
//!
//! Services are thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for operating system access
//! - Return domain types as outputs

mod reaper;
mod scanner;

pub use reaper::ProcessReaper;
pub use scanner::{PortScanner, ScanOptions, DEFAULT_CONCURRENCY};
