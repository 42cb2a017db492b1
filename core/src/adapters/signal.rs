//! Signal delivery for the current platform.
//!
//! - Unix: `kill(2)` via nix, SIGTERM or SIGKILL.
//! - Windows: `taskkill /PID N`, with `/F` for a forced kill.

use tracing::debug;

use crate::domain::Signal;
use crate::error::SignalError;
use crate::ports::SignalSender;

/// Sends termination signals with the platform's native mechanism.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformSignalSender;

impl PlatformSignalSender {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl SignalSender for PlatformSignalSender {
    async fn send(&self, pid: u32, signal: Signal) -> Result<(), SignalError> {
        use nix::errno::Errno;
        use nix::sys::signal::{kill, Signal as UnixSignal};
        use nix::unistd::Pid;

        // 0 and negative values address process groups, never a single process
        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => {
                return Err(SignalError::Failed {
                    pid,
                    reason: "not a valid process id".to_string(),
                })
            }
        };

        let unix_signal = match signal {
            Signal::Terminate => UnixSignal::SIGTERM,
            Signal::Kill => UnixSignal::SIGKILL,
        };

        debug!(pid, signal = %signal, "Sending signal to process");
        match kill(Pid::from_raw(raw), unix_signal) {
            Ok(()) => Ok(()),
            Err(Errno::EPERM) => Err(SignalError::PermissionDenied(pid)),
            Err(Errno::ESRCH) => Err(SignalError::ProcessNotFound(pid)),
            Err(errno) => Err(SignalError::Failed {
                pid,
                reason: errno.desc().to_string(),
            }),
        }
    }
}

#[cfg(windows)]
impl SignalSender for PlatformSignalSender {
    async fn send(&self, pid: u32, signal: Signal) -> Result<(), SignalError> {
        use tokio::process::Command;

        debug!(pid, signal = %signal, "Executing taskkill");

        let mut cmd = Command::new("taskkill");
        cmd.arg("/PID").arg(pid.to_string());
        if signal == Signal::Kill {
            cmd.arg("/F");
        }

        let output = cmd.output().await.map_err(|e| SignalError::Failed {
            pid,
            reason: format!("Failed to run taskkill: {}", e),
        })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let combined = format!("{} {}", stdout, stderr);

        if combined.contains("not found") || combined.contains("could not be found") {
            return Err(SignalError::ProcessNotFound(pid));
        }
        if combined.contains("Access is denied") || combined.contains("access denied") {
            return Err(SignalError::PermissionDenied(pid));
        }

        Err(SignalError::Failed {
            pid,
            reason: combined.trim().to_string(),
        })
    }
}

#[cfg(not(any(unix, windows)))]
impl SignalSender for PlatformSignalSender {
    async fn send(&self, pid: u32, _signal: Signal) -> Result<(), SignalError> {
        Err(SignalError::Failed {
            pid,
            reason: format!("signals are not supported on {}", std::env::consts::OS),
        })
    }
}
