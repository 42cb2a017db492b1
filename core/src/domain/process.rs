//! Process and kill outcome domain models.

use serde::Serialize;

use crate::error::SignalError;

/// A process found bound to a port.
///
/// Produced by the process-table lookup and consumed by the kill step of the
/// same invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessHandle {
    /// Process ID.
    pub pid: u32,
    /// The port the process was resolved against.
    pub port: u16,
    /// Process name, when the platform table reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProcessHandle {
    pub fn new(pid: u32, port: u16) -> Self {
        Self {
            pid,
            port,
            name: None,
        }
    }

    pub fn with_name(pid: u32, port: u16, name: impl Into<String>) -> Self {
        Self {
            pid,
            port,
            name: Some(name.into()),
        }
    }
}

/// Signal used to terminate a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    /// Ask the process to exit (SIGTERM, `taskkill`).
    #[default]
    Terminate,
    /// Kill the process immediately (SIGKILL, `taskkill /F`).
    Kill,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Terminate => write!(f, "SIGTERM"),
            Signal::Kill => write!(f, "SIGKILL"),
        }
    }
}

/// Result of signaling one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PidReport {
    #[serde(flatten)]
    pub handle: ProcessHandle,
    #[serde(serialize_with = "serialize_signal_result")]
    pub result: Result<(), SignalError>,
}

impl PidReport {
    pub fn pid(&self) -> u32 {
        self.handle.pid
    }

    pub fn is_terminated(&self) -> bool {
        self.result.is_ok()
    }
}

fn serialize_signal_result<S>(
    result: &Result<(), SignalError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match result {
        Ok(()) => serializer.serialize_none(),
        Err(e) => serializer.serialize_some(e),
    }
}

/// Outcome of killing whatever holds a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum KillOutcome {
    /// Nothing was bound to the port. Not an error.
    NoProcessFound { port: u16 },
    /// One report per process, in process-table order.
    Signaled { port: u16, reports: Vec<PidReport> },
}

impl KillOutcome {
    pub fn port(&self) -> u16 {
        match self {
            KillOutcome::NoProcessFound { port } | KillOutcome::Signaled { port, .. } => *port,
        }
    }

    /// All per-process reports (empty when nothing was found).
    pub fn reports(&self) -> &[PidReport] {
        match self {
            KillOutcome::NoProcessFound { .. } => &[],
            KillOutcome::Signaled { reports, .. } => reports,
        }
    }

    /// Pids that were signaled successfully.
    pub fn terminated(&self) -> Vec<u32> {
        self.reports()
            .iter()
            .filter(|r| r.is_terminated())
            .map(PidReport::pid)
            .collect()
    }

    /// Reports whose signal could not be delivered.
    pub fn failed(&self) -> Vec<&PidReport> {
        self.reports().iter().filter(|r| !r.is_terminated()).collect()
    }
}
