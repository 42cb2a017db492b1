//! Linux process table implementation using ss.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ProcessHandle;
use crate::error::{Error, Result};
use crate::ports::ProcessTable;

use super::utils::Utils;

/// Linux-specific process table.
pub struct LinuxProcessTable;

impl LinuxProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for LinuxProcessTable {
    /// Executes: `ss -Htulnp`
    ///
    /// Flags explained:
    /// -H, --no-header     Suppress header line
    /// -t, --tcp           display TCP sockets
    /// -u, --udp           display UDP sockets
    /// -l, --listening     display listening sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    async fn processes_on_port(&self, port: u16) -> Result<Vec<ProcessHandle>> {
        let output = Command::new("ss")
            .args(["-Htulnp"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "ss exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        let handles = Utils::parse_ss_output(&stdout, port)?;
        debug!(port, count = handles.len(), "Resolved processes with ss");
        Ok(handles)
    }
}
