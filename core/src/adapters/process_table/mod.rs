//! Process table adapters.
//!
//! Platform-specific lookups of the processes bound to a port.

#[cfg(target_os = "macos")]
mod darwin;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

mod utils;

use crate::domain::ProcessHandle;
use crate::error::Result;
use crate::ports::ProcessTable;

pub use utils::Utils;

/// The process table for the current platform.
pub struct PlatformProcessTable {
    #[cfg(target_os = "macos")]
    inner: darwin::DarwinProcessTable,

    #[cfg(target_os = "linux")]
    inner: linux::LinuxProcessTable,

    #[cfg(target_os = "windows")]
    inner: windows::WindowsProcessTable,
}

impl PlatformProcessTable {
    /// Create a new process table for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "macos")]
            inner: darwin::DarwinProcessTable::new(),

            #[cfg(target_os = "linux")]
            inner: linux::LinuxProcessTable::new(),

            #[cfg(target_os = "windows")]
            inner: windows::WindowsProcessTable::new(),
        }
    }
}

impl Default for PlatformProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
impl ProcessTable for PlatformProcessTable {
    async fn processes_on_port(&self, port: u16) -> Result<Vec<ProcessHandle>> {
        self.inner.processes_on_port(port).await
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
impl ProcessTable for PlatformProcessTable {
    async fn processes_on_port(&self, _port: u16) -> Result<Vec<ProcessHandle>> {
        Err(crate::error::Error::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}
