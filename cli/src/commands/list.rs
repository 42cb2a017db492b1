//! List command - show all busy ports.

use std::io::Write;

use anyhow::Result;
use portcheck_core::{BusyPorts, PortScanner, ScanOptions, TcpBindProbe};

pub async fn run(options: ScanOptions, json: bool, out: &mut impl Write) -> Result<()> {
    if !json {
        writeln!(out, "🔎 Scanning ports. This may take a moment...")?;
        out.flush()?;
    }

    let scanner = PortScanner::new(TcpBindProbe::detect()).with_concurrency(options.concurrency);
    let busy = scanner.scan(options.range).await;

    render(&busy, json, out)
}

/// Print the scan result, one `- Port N` line per busy port.
pub fn render(busy: &BusyPorts, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(busy)?)?;
        return Ok(());
    }

    if busy.is_empty() {
        writeln!(out, "✅ No busy ports found.")?;
        return Ok(());
    }

    writeln!(out, "🚫 Busy ports:")?;
    for port in busy {
        writeln!(out, "- Port {}", port)?;
    }
    Ok(())
}
