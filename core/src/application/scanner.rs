//! Port scanning application service.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::adapters::TcpBindProbe;
use crate::domain::{BusyPorts, PortRange};
use crate::ports::PortProbe;

/// Default number of probes allowed to hold a socket at the same time.
pub const DEFAULT_CONCURRENCY: usize = 1024;

/// Options for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Ports to scan, inclusive.
    pub range: PortRange,
    /// Maximum concurrent probes. `0` removes the limit.
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            range: PortRange::FULL,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Application service that finds busy ports in a range.
///
/// Every port in the range gets its own probe task; all of them are launched
/// up front and awaited as one batch. It uses the `PortProbe` trait for the
/// actual check, allowing different implementations to be injected.
pub struct PortScanner<P: PortProbe + 'static> {
    probe: Arc<P>,
    concurrency: usize,
}

impl<P: PortProbe + 'static> PortScanner<P> {
    /// Create a new scanner with the given probe.
    pub fn new(probe: P) -> Self {
        Self {
            probe: Arc::new(probe),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Limit how many probes run at once. `0` removes the limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Scan every port in `range` and return the busy ones in ascending order.
    ///
    /// Never fails: a probe task that does not complete counts as busy.
    pub async fn scan(&self, range: PortRange) -> BusyPorts {
        let started = Instant::now();
        info!(range = %range, ports = range.port_count(), "Scanning ports");

        let limit = (self.concurrency > 0)
            .then(|| Arc::new(Semaphore::new(self.concurrency.min(Semaphore::MAX_PERMITS))));

        let mut tasks = JoinSet::new();
        for port in range {
            let probe = Arc::clone(&self.probe);
            let limit = limit.clone();
            tasks.spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                (port, probe.probe(port).await)
            });
        }

        let count = range.port_count() as usize;
        let mut results = Vec::with_capacity(count);
        let mut reported = vec![false; count];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((port, busy)) => {
                    reported[usize::from(port - range.start())] = true;
                    results.push((port, busy));
                }
                Err(e) => warn!(error = %e, "Probe task failed"),
            }
        }

        // Ports whose probe never reported back are treated as busy
        for (offset, _) in reported.iter().enumerate().filter(|(_, done)| !**done) {
            results.push((range.start() + offset as u16, true));
        }

        let busy = BusyPorts::from_probe_results(results);
        info!(
            range = %range,
            busy = busy.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan finished"
        );
        busy
    }
}

impl Default for PortScanner<TcpBindProbe> {
    fn default() -> Self {
        Self::new(TcpBindProbe::detect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use tokio::net::TcpListener;

    /// Mock probe reporting a fixed set of ports as busy.
    struct MockProbe {
        busy: HashSet<u16>,
        probed: Mutex<Vec<u16>>,
    }

    impl MockProbe {
        fn new(busy: impl IntoIterator<Item = u16>) -> Self {
            Self {
                busy: busy.into_iter().collect(),
                probed: Mutex::new(Vec::new()),
            }
        }
    }

    impl PortProbe for MockProbe {
        async fn probe(&self, port: u16) -> bool {
            self.probed.lock().push(port);
            // Let later ports complete first
            tokio::task::yield_now().await;
            self.busy.contains(&port)
        }
    }

    /// Probe that panics on one port.
    struct PanickingProbe(u16);

    impl PortProbe for PanickingProbe {
        async fn probe(&self, port: u16) -> bool {
            if port == self.0 {
                panic!("probe failure on {}", port);
            }
            false
        }
    }

    /// Probe that records the peak number of concurrent probes.
    #[derive(Default)]
    struct CountingProbe {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl PortProbe for CountingProbe {
        async fn probe(&self, _port: u16) -> bool {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            false
        }
    }

    #[tokio::test]
    async fn test_scan_finds_exactly_the_busy_port() {
        let scanner = PortScanner::new(MockProbe::new([3001]));
        let busy = scanner.scan(PortRange::new(3000, 3002).unwrap()).await;
        assert_eq!(busy.as_slice(), &[3001]);
    }

    #[tokio::test]
    async fn test_scan_probes_every_port_once() {
        let scanner = PortScanner::new(MockProbe::new([]));
        let busy = scanner.scan(PortRange::new(100, 199).unwrap()).await;
        assert!(busy.is_empty());

        let mut probed = scanner.probe.probed.lock().clone();
        probed.sort_unstable();
        assert_eq!(probed, (100..=199).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_scan_output_is_ascending() {
        let scanner = PortScanner::new(MockProbe::new([9, 2, 7, 4]));
        let busy = scanner.scan(PortRange::new(1, 10).unwrap()).await;
        assert_eq!(busy.as_slice(), &[2, 4, 7, 9]);
    }

    #[tokio::test]
    async fn test_scan_is_repeatable() {
        let scanner = PortScanner::new(MockProbe::new([22, 80, 443]));
        let range = PortRange::new(1, 1000).unwrap();
        let first = scanner.scan(range).await;
        let second = scanner.scan(range).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_probe_counts_as_busy() {
        let scanner = PortScanner::new(PanickingProbe(5));
        let busy = scanner.scan(PortRange::new(1, 8).unwrap()).await;
        assert_eq!(busy.as_slice(), &[5]);
    }

    #[tokio::test]
    async fn test_concurrency_limit() {
        let scanner = PortScanner::new(CountingProbe::default()).with_concurrency(4);
        scanner.scan(PortRange::new(1, 200).unwrap()).await;
        let peak = scanner.probe.peak.load(Ordering::SeqCst);
        assert!((1..=4).contains(&peak), "peak concurrency was {}", peak);
    }

    #[tokio::test]
    async fn test_scan_range_ending_at_max_port() {
        let scanner = PortScanner::new(MockProbe::new([65535]));
        let busy = scanner.scan(PortRange::new(65530, 65535).unwrap()).await;
        assert_eq!(busy.as_slice(), &[65535]);
    }

    #[tokio::test]
    async fn test_scan_detects_real_listener() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let scanner = PortScanner::<TcpBindProbe>::default();
        let busy = scanner.scan(PortRange::single(port)).await;
        assert_eq!(busy.as_slice(), &[port]);

        drop(listener);
        let busy = scanner.scan(PortRange::single(port)).await;
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn test_real_listener_leaves_neighbours_free() {
        // Retry until both neighbours of the listener start out free
        let (listener, range) = loop {
            let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
            let port = listener.local_addr().unwrap().port();
            let range = PortRange::new(port.saturating_sub(1).max(1), port.saturating_add(1))
                .unwrap();
            let neighbours_free = range
                .iter()
                .filter(|&p| p != port)
                .all(|p| std::net::TcpListener::bind(("0.0.0.0", p)).is_ok());
            if neighbours_free {
                break (listener, range);
            }
        };
        let port = listener.local_addr().unwrap().port();

        let scanner = PortScanner::<TcpBindProbe>::default();
        let busy = scanner.scan(range).await;
        assert_eq!(busy.as_slice(), &[port]);
    }
}
