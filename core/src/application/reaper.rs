//! Process termination application service.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::adapters::{PlatformProcessTable, PlatformSignalSender};
use crate::domain::{KillOutcome, PidReport, Signal};
use crate::error::{Error, Result};
use crate::ports::{ProcessTable, SignalSender};

/// Application service that terminates whatever holds a port.
///
/// Resolution goes through a `ProcessTable`, delivery through a
/// `SignalSender`; both are injected so the policy can be tested without
/// touching real processes.
pub struct ProcessReaper<T: ProcessTable, S: SignalSender> {
    table: T,
    sender: S,
    signal: Signal,
}

impl<T: ProcessTable, S: SignalSender> ProcessReaper<T, S> {
    /// Create a reaper sending `Signal::Terminate`.
    pub fn new(table: T, sender: S) -> Self {
        Self {
            table,
            sender,
            signal: Signal::default(),
        }
    }

    /// Use a different signal (e.g. `Signal::Kill` for a forced kill).
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }

    /// Find every process bound to `port` and signal each one.
    ///
    /// A failed lookup aborts with `Error::ProcessQuery` before any signal is
    /// sent. Per-process failures are recorded in the outcome and never stop
    /// the remaining processes from being signaled.
    pub async fn kill(&self, port: u16) -> Result<KillOutcome> {
        let handles = self
            .table
            .processes_on_port(port)
            .await
            .map_err(|e| match e {
                Error::ProcessQuery { .. } => e,
                other => Error::ProcessQuery {
                    port,
                    reason: other.to_string(),
                },
            })?;

        if handles.is_empty() {
            debug!(port, "No process found");
            return Ok(KillOutcome::NoProcessFound { port });
        }

        let mut seen: HashSet<u32> = HashSet::new();
        let mut reports = Vec::with_capacity(handles.len());

        for handle in handles {
            if !seen.insert(handle.pid) {
                continue;
            }

            let result = self.sender.send(handle.pid, self.signal).await;
            match &result {
                Ok(()) => info!(port, pid = handle.pid, signal = %self.signal, "Signaled process"),
                Err(e) => warn!(port, pid = handle.pid, error = %e, "Failed to signal process"),
            }
            reports.push(PidReport { handle, result });
        }

        Ok(KillOutcome::Signaled { port, reports })
    }
}

impl Default for ProcessReaper<PlatformProcessTable, PlatformSignalSender> {
    fn default() -> Self {
        Self::new(PlatformProcessTable::new(), PlatformSignalSender::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use crate::domain::ProcessHandle;
    use crate::error::SignalError;

    /// Mock process table returning a canned answer.
    struct MockTable {
        answer: Mutex<Option<Result<Vec<ProcessHandle>>>>,
        queries: Mutex<Vec<u16>>,
    }

    impl MockTable {
        fn returning(pids: &[u32]) -> Self {
            let handles = pids.iter().map(|&pid| ProcessHandle::new(pid, 3000)).collect();
            Self::with_answer(Ok(handles))
        }

        fn failing(reason: &str) -> Self {
            Self::with_answer(Err(Error::CommandFailed(reason.to_string())))
        }

        fn with_answer(answer: Result<Vec<ProcessHandle>>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProcessTable for MockTable {
        async fn processes_on_port(&self, port: u16) -> Result<Vec<ProcessHandle>> {
            self.queries.lock().push(port);
            self.answer.lock().take().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Mock sender that records calls and fails for configured pids.
    #[derive(Default)]
    struct MockSender {
        failures: HashMap<u32, SignalError>,
        calls: Mutex<Vec<(u32, Signal)>>,
    }

    impl MockSender {
        fn failing_for(failures: impl IntoIterator<Item = SignalError>) -> Self {
            Self {
                failures: failures.into_iter().map(|e| (e.pid(), e)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl SignalSender for MockSender {
        async fn send(&self, pid: u32, signal: Signal) -> std::result::Result<(), SignalError> {
            self.calls.lock().push((pid, signal));
            match self.failures.get(&pid) {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_no_process_found_sends_nothing() {
        let reaper = ProcessReaper::new(MockTable::returning(&[]), MockSender::default());

        let outcome = reaper.kill(1234).await.unwrap();

        assert_eq!(outcome, KillOutcome::NoProcessFound { port: 1234 });
        assert_eq!(*reaper.table.queries.lock(), vec![1234]);
        assert!(reaper.sender.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_single_process_is_signaled_once() {
        let reaper = ProcessReaper::new(MockTable::returning(&[4321]), MockSender::default());

        let outcome = reaper.kill(3000).await.unwrap();

        assert_eq!(*reaper.sender.calls.lock(), vec![(4321, Signal::Terminate)]);
        assert_eq!(outcome.terminated(), vec![4321]);
        assert!(outcome.failed().is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_pids() {
        let reaper = ProcessReaper::new(
            MockTable::returning(&[10, 11, 12]),
            MockSender::failing_for([SignalError::PermissionDenied(11)]),
        );

        let outcome = reaper.kill(3000).await.unwrap();

        let calls: Vec<u32> = reaper.sender.calls.lock().iter().map(|(pid, _)| *pid).collect();
        assert_eq!(calls, vec![10, 11, 12]);

        let reports = outcome.reports();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].result, Ok(()));
        assert_eq!(reports[1].result, Err(SignalError::PermissionDenied(11)));
        assert_eq!(reports[2].result, Ok(()));
    }

    #[tokio::test]
    async fn test_every_pid_failing_is_still_an_outcome() {
        let reaper = ProcessReaper::new(
            MockTable::returning(&[20, 21]),
            MockSender::failing_for([
                SignalError::ProcessNotFound(20),
                SignalError::Failed {
                    pid: 21,
                    reason: "boom".to_string(),
                },
            ]),
        );

        let outcome = reaper.kill(3000).await.unwrap();

        assert!(outcome.terminated().is_empty());
        let failed: Vec<u32> = outcome.failed().iter().map(|r| r.pid()).collect();
        assert_eq!(failed, vec![20, 21]);
    }

    #[tokio::test]
    async fn test_query_failure_aborts_before_signaling() {
        let reaper = ProcessReaper::new(MockTable::failing("ss missing"), MockSender::default());

        let err = reaper.kill(3000).await.unwrap_err();

        match err {
            Error::ProcessQuery { port, reason } => {
                assert_eq!(port, 3000);
                assert!(reason.contains("ss missing"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(reaper.sender.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_pids_signaled_once() {
        let reaper = ProcessReaper::new(MockTable::returning(&[7, 8, 7]), MockSender::default());

        let outcome = reaper.kill(3000).await.unwrap();

        assert_eq!(reaper.sender.calls.lock().len(), 2);
        assert_eq!(outcome.terminated(), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_forced_kill_uses_sigkill() {
        let reaper = ProcessReaper::new(MockTable::returning(&[99]), MockSender::default())
            .with_signal(Signal::Kill);

        reaper.kill(3000).await.unwrap();

        assert_eq!(*reaper.sender.calls.lock(), vec![(99, Signal::Kill)]);
    }
}
