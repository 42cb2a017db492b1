//! Port probe backed by a TCP bind attempt.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::TcpSocket;
use tracing::{debug, trace};

use crate::ports::PortProbe;

/// Probes a port by binding a listener to it on a wildcard address.
///
/// A successful bind means the port is free; the listener is dropped before
/// the probe returns. Any bind error counts as busy.
///
/// On `[::]` the socket is switched to dual stack so one bind covers IPv4
/// listeners too. When the platform keeps the socket IPv6-only, the port is
/// bound a second time on `0.0.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpBindProbe {
    host: IpAddr,
    dual_stack: bool,
}

impl TcpBindProbe {
    /// Probe on `[::]` when the host has IPv6, otherwise on `0.0.0.0`.
    pub fn detect() -> Self {
        let host = match std::net::TcpListener::bind((Ipv6Addr::UNSPECIFIED, 0)) {
            Ok(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            Err(e) => {
                debug!(error = %e, "IPv6 wildcard unavailable, probing on 0.0.0.0");
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }
        };
        Self::with_host(host)
    }

    /// Probe on a specific address.
    pub fn with_host(host: IpAddr) -> Self {
        Self {
            host,
            dual_stack: true,
        }
    }

    /// The address ports are bound on.
    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Bind `addr` and release it again. Returns whether the socket also
    /// covered IPv4.
    fn try_bind(&self, addr: SocketAddr) -> io::Result<bool> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };

        // Windows lets SO_REUSEADDR take over a port someone else holds
        #[cfg(unix)]
        socket.set_reuseaddr(true)?;

        let covers_v4 = match addr {
            SocketAddr::V4(_) => true,
            SocketAddr::V6(_) => set_only_v6(&socket, !self.dual_stack) && self.dual_stack,
        };

        socket.bind(addr)?;
        let listener = socket.listen(1)?;
        drop(listener);
        Ok(covers_v4)
    }
}

impl Default for TcpBindProbe {
    fn default() -> Self {
        Self::detect()
    }
}

impl PortProbe for TcpBindProbe {
    async fn probe(&self, port: u16) -> bool {
        // Binding port 0 asks the OS for an ephemeral port and always succeeds
        if port == 0 {
            return true;
        }

        let covers_v4 = match self.try_bind(SocketAddr::new(self.host, port)) {
            Ok(covers_v4) => covers_v4,
            Err(e) => {
                trace!(port, error = %e, "Bind failed, port is busy");
                return true;
            }
        };

        if self.host == IpAddr::V6(Ipv6Addr::UNSPECIFIED) && !covers_v4 {
            let v4 = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
            if let Err(e) = self.try_bind(v4) {
                trace!(port, error = %e, "IPv4 bind failed, port is busy");
                return true;
            }
        }

        false
    }
}

/// Set `IPV6_V6ONLY`. Returns whether the option was applied.
#[cfg(unix)]
fn set_only_v6(socket: &TcpSocket, only_v6: bool) -> bool {
    use nix::sys::socket::{setsockopt, sockopt::Ipv6V6Only};

    match setsockopt(socket, Ipv6V6Only, &only_v6) {
        Ok(()) => true,
        Err(e) => {
            trace!(error = %e, "Could not set IPV6_V6ONLY");
            false
        }
    }
}

#[cfg(not(unix))]
fn set_only_v6(_socket: &TcpSocket, _only_v6: bool) -> bool {
    false
}
