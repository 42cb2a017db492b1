//! Port range and scan result domain models.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// PortRange
// ============================================================================

/// An inclusive range of ports to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// The full range of usable ports (1-65535).
    pub const FULL: PortRange = PortRange {
        start: 1,
        end: u16::MAX,
    };

    /// Create a range, rejecting `start > end`.
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {} is greater than end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one port.
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range (never zero).
    pub fn port_count(&self) -> u32 {
        u32::from(self.end) - u32::from(self.start) + 1
    }

    /// Iterate ports in ascending order.
    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl IntoIterator for PortRange {
    type Item = u16;
    type IntoIter = RangeInclusive<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for PortRange {
    type Err = Error;

    /// Parse `"START-END"` or a single `"PORT"`.
    fn from_str(s: &str) -> Result<Self> {
        let parse_port = |value: &str| -> Result<u16> {
            value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidRange(format!("'{}' is not a port number", value.trim())))
        };

        match s.split_once('-') {
            Some((start, end)) => PortRange::new(parse_port(start)?, parse_port(end)?),
            None => Ok(PortRange::single(parse_port(s)?)),
        }
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// BusyPorts
// ============================================================================

/// Ports found occupied during one scan, ascending by port number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BusyPorts(Vec<u16>);

impl BusyPorts {
    /// Build the result from `(port, busy)` pairs in any completion order.
    pub fn from_probe_results(mut results: Vec<(u16, bool)>) -> Self {
        results.sort_unstable_by_key(|(port, _)| *port);
        Self(
            results
                .into_iter()
                .filter_map(|(port, busy)| busy.then_some(port))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, port: u16) -> bool {
        self.0.binary_search(&port).is_ok()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u16> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a BusyPorts {
    type Item = &'a u16;
    type IntoIter = std::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
