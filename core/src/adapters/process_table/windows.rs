//! Windows process table implementation using netstat.

use tokio::process::Command;
use tracing::debug;

use crate::domain::ProcessHandle;
use crate::error::{Error, Result};
use crate::ports::ProcessTable;

use super::utils::Utils;

/// Windows-specific process table.
pub struct WindowsProcessTable;

impl WindowsProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for WindowsProcessTable {
    /// Executes: `netstat -ano`
    async fn processes_on_port(&self, port: u16) -> Result<Vec<ProcessHandle>> {
        let output = Command::new("netstat")
            .arg("-ano")
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("netstat -ano: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "netstat -ano failed: {}",
                stderr.trim()
            )));
        }

        // netstat output follows the console code page; addresses and pids are ASCII
        let stdout = String::from_utf8_lossy(&output.stdout);
        let handles = Utils::parse_netstat_output(&stdout, port);
        debug!(port, count = handles.len(), "Resolved processes with netstat");
        Ok(handles)
    }
}
