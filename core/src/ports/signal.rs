//! Signal sender port (interface).

use crate::domain::Signal;
use crate::error::SignalError;

/// Port for delivering a termination signal to a process.
///
/// Implementations handle platform-specific signal handling.
pub trait SignalSender: Send + Sync {
    /// Send `signal` to `pid`. Exactly one attempt, no retries.
    fn send(
        &self,
        pid: u32,
        signal: Signal,
    ) -> impl std::future::Future<Output = Result<(), SignalError>> + Send;
}
