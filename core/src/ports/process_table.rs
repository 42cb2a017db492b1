//! Process table port (interface).

use crate::domain::ProcessHandle;
use crate::error::Result;

/// Port for resolving which processes are bound to a network port.
///
/// Implementations handle platform-specific details (ss, lsof, netstat).
pub trait ProcessTable: Send + Sync {
    /// Find all processes bound to `port`, in the order the platform reports them.
    ///
    /// An empty list means nothing is bound. Errors mean the lookup itself failed.
    fn processes_on_port(
        &self,
        port: u16,
    ) -> impl std::future::Future<Output = Result<Vec<ProcessHandle>>> + Send;
}
