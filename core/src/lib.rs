//! port-check Core Library
//!
//! Finds busy ports and frees them. Provides functionality to:
//! - Probe a single port by attempting to bind it
//! - Scan an inclusive port range for busy ports, concurrently
//! - Resolve the processes bound to a port and signal each of them
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: Operating system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux: Uses `ss` to resolve processes, `kill(2)` to signal
//! - macOS: Uses `lsof` to resolve processes, `kill(2)` to signal
//! - Windows: Uses `netstat` and `taskkill`

pub mod adapters;
pub mod application;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export domain types (primary API)
pub use domain::{BusyPorts, KillOutcome, PidReport, PortRange, ProcessHandle, Signal};

// Re-export other commonly used types
pub use adapters::{PlatformProcessTable, PlatformSignalSender, TcpBindProbe};
pub use application::{PortScanner, ProcessReaper, ScanOptions};
pub use error::{Error, Result, SignalError};
pub use ports::{PortProbe, ProcessTable, SignalSender};

/// Scan `range` for busy ports with the platform probe.
pub async fn scan_ports(range: PortRange) -> BusyPorts {
    PortScanner::<TcpBindProbe>::default().scan(range).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_ports_reports_listener() {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let busy = scan_ports(PortRange::single(port)).await;
        assert_eq!(busy.as_slice(), &[port]);
    }
}
