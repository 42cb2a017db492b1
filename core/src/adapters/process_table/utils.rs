//! Parsers for the process-table commands of every platform.
//!
//! These are kept platform-independent so they are tested on every host.

use std::collections::HashSet;

use regex::Regex;

use crate::domain::ProcessHandle;
use crate::error::{Error, Result};

pub struct Utils;

impl Utils {
    /// Parse an address:port string.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1]:8080"
    /// - Interface-scoped: "127.0.0.53%lo:53"
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        if address.starts_with('[') {
            // IPv6 format: [::1]:3000
            let bracket_end = address.find(']')?;
            if bracket_end + 1 >= address.len() || address.as_bytes()[bracket_end + 1] != b':' {
                return None;
            }
            let addr = &address[..=bracket_end];
            let port_str = &address[bracket_end + 2..];
            let port: u16 = port_str.parse().ok()?;
            Some((addr.to_string(), port))
        } else {
            // IPv4 format: 127.0.0.1:3000 or *:8080
            let last_colon = address.rfind(':')?;
            let addr = &address[..last_colon];
            let port_str = &address[last_colon + 1..];
            let port: u16 = port_str.parse().ok()?;
            let addr = if addr.is_empty() || addr == "0.0.0.0" {
                "*"
            } else {
                addr
            };
            Some((addr.to_string(), port))
        }
    }

    /// Parse `ss -Htulnp` output into the processes bound to `port`.
    ///
    /// Expected ss output format:
    /// ```text
    /// Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
    /// tcp   LISTEN 0      4096   127.0.0.1:3000     0.0.0.0:*         users:(("node",pid=53561,fd=19))
    /// udp   UNCONN 0      0      0.0.0.0:5353       0.0.0.0:*         users:(("avahi",pid=612,fd=12),("avahi",pid=613,fd=12))
    /// ```
    ///
    /// Rows without a process column (sockets owned by other users when not
    /// running as root) are skipped.
    pub fn parse_ss_output(output: &str, port: u16) -> Result<Vec<ProcessHandle>> {
        let regex = Regex::new(r#"\("([^"]*)",pid=(\d+)"#)
            .map_err(|e| Error::ParseError(format!("Invalid ss pattern: {}", e)))?;

        let mut handles = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();

        for line in output.lines() {
            // Parse columns: [Netid] [State] [Recv-Q] [Send-Q] [Local] [Peer] [Process...]
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 7 {
                continue;
            }

            match Self::parse_address(components[4]) {
                Some((_, local_port)) if local_port == port => {}
                _ => continue,
            }

            let process = components[6..].join(" ");
            for caps in regex.captures_iter(&process) {
                let pid: u32 = match caps[2].parse() {
                    Ok(p) => p,
                    Err(_) => continue,
                };

                // Deduplicate by pid (IPv4 and IPv6 sockets of one process)
                if seen.insert(pid) {
                    handles.push(ProcessHandle::with_name(pid, port, &caps[1]));
                }
            }
        }

        Ok(handles)
    }

    /// Parse `lsof -F pc` field output into processes bound to `port`.
    ///
    /// Each process starts with a `p<pid>` line, optionally followed by a
    /// `c<command>` line:
    /// ```text
    /// p53561
    /// cnode
    /// f19
    /// ```
    pub fn parse_lsof_fields(output: &str, port: u16) -> Vec<ProcessHandle> {
        let mut handles: Vec<ProcessHandle> = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();
        // Whether the last `p` line started a new handle
        let mut current_is_new = false;

        for line in output.lines() {
            let line = line.trim();
            if let Some(pid) = line.strip_prefix('p') {
                let Ok(pid) = pid.parse::<u32>() else {
                    current_is_new = false;
                    continue;
                };
                current_is_new = seen.insert(pid);
                if current_is_new {
                    handles.push(ProcessHandle::new(pid, port));
                }
            } else if let Some(command) = line.strip_prefix('c') {
                if let (true, Some(last)) = (current_is_new, handles.last_mut()) {
                    last.name = Some(command.to_string());
                }
            }
        }

        handles
    }

    /// Parse `netstat -ano` output into processes bound to `port`.
    ///
    /// Example output:
    /// ```text
    /// Active Connections
    ///
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
    ///   TCP    [::]:445               [::]:0                 LISTENING       4
    ///   UDP    0.0.0.0:5353           *:*                                    2204
    /// ```
    pub fn parse_netstat_output(output: &str, port: u16) -> Vec<ProcessHandle> {
        let mut handles = Vec::new();
        let mut seen: HashSet<u32> = HashSet::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();

            // TCP rows: Proto, Local, Foreign, State, PID. UDP rows have no state.
            let pid_column = match parts.first() {
                Some(&"TCP") if parts.len() >= 5 && parts[3] == "LISTENING" => 4,
                Some(&"UDP") if parts.len() >= 4 => 3,
                _ => continue,
            };

            match Self::parse_address(parts[1]) {
                Some((_, local_port)) if local_port == port => {}
                _ => continue,
            }

            let pid: u32 = match parts[pid_column].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            // PID 0 is the System Idle pseudo-process
            if pid != 0 && seen.insert(pid) {
                handles.push(ProcessHandle::new(pid, port));
            }
        }

        handles
    }
}
