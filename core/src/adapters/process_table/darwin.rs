//! macOS process table implementation using lsof.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ProcessHandle;
use crate::error::{Error, Result};
use crate::ports::ProcessTable;

use super::utils::Utils;

/// macOS-specific process table using lsof.
pub struct DarwinProcessTable;

impl DarwinProcessTable {
    pub fn new() -> Self {
        Self
    }

    /// Run lsof for one selector (e.g. `-iTCP:3000 -sTCP:LISTEN`) and return its field output.
    ///
    /// lsof exits with code 1 and prints nothing when no process matches,
    /// which is not an error.
    async fn lsof(&self, selector: &[&str]) -> Result<String> {
        let output = Command::new("/usr/sbin/lsof")
            .args(["-nP", "-Fpc"])
            .args(selector)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        let no_match = output.status.code() == Some(1) && stdout.trim().is_empty();
        if !output.status.success() && !no_match {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "lsof exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(stdout)
    }
}

impl Default for DarwinProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for DarwinProcessTable {
    /// Executes: `lsof -nP -Fpc -iTCP:PORT -sTCP:LISTEN` and `lsof -nP -Fpc -iUDP:PORT`
    async fn processes_on_port(&self, port: u16) -> Result<Vec<ProcessHandle>> {
        let tcp = format!("-iTCP:{}", port);
        let udp = format!("-iUDP:{}", port);

        let mut output = self.lsof(&[&tcp, "-sTCP:LISTEN"]).await?;
        output.push_str(&self.lsof(&[&udp]).await?);

        let handles = Utils::parse_lsof_fields(&output, port);
        debug!(port, count = handles.len(), "Resolved processes with lsof");
        Ok(handles)
    }
}
