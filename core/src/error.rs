//! Error types for the portcheck-core library.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for port-check operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or terminating processes by port.
#[derive(Error, Debug)]
pub enum Error {
    /// The process-table lookup for a port failed.
    #[error("Failed to query processes on port {port}: {reason}")]
    ProcessQuery { port: u16, reason: String },

    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// A port range whose start is past its end, or that could not be parsed.
    #[error("Invalid port range: {0}")]
    InvalidRange(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Why a signal could not be delivered to one process.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "camelCase")]
pub enum SignalError {
    /// Permission denied to signal the process.
    #[error("Permission denied to kill process {0}")]
    PermissionDenied(u32),

    /// The process exited before the signal was delivered.
    #[error("Process with PID {0} not found")]
    ProcessNotFound(u32),

    /// Any other delivery failure.
    #[error("Failed to terminate process {pid}: {reason}")]
    Failed { pid: u32, reason: String },
}

impl SignalError {
    /// The pid the failed signal was addressed to.
    pub fn pid(&self) -> u32 {
        match self {
            SignalError::PermissionDenied(pid) | SignalError::ProcessNotFound(pid) => *pid,
            SignalError::Failed { pid, .. } => *pid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_error_display() {
        let err = SignalError::ProcessNotFound(1234);
        assert!(err.to_string().contains("1234"));

        let err = SignalError::PermissionDenied(5678);
        assert!(err.to_string().contains("5678"));
        assert_eq!(err.pid(), 5678);

        let err = SignalError::Failed {
            pid: 42,
            reason: "test error".to_string(),
        };
        assert!(err.to_string().contains("test error"));
        assert_eq!(err.pid(), 42);
    }

    #[test]
    fn test_process_query_display() {
        let err = Error::ProcessQuery {
            port: 3000,
            reason: "ss not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3000"));
        assert!(msg.contains("ss not found"));
    }
}
