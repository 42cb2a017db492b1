//! Port probe port (interface).

/// Port for checking whether a single port is occupied.
///
/// Implementations must be total: any failure to determine the state of a
/// port is reported as busy.
pub trait PortProbe: Send + Sync {
    /// Returns `true` if `port` is currently bound by some process.
    fn probe(&self, port: u16) -> impl std::future::Future<Output = bool> + Send;
}
