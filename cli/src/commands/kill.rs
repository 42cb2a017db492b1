//! Kill command - terminate the processes holding a port.
//!
//! Per-process failures are printed but never change the exit code.

use std::io::Write;

use anyhow::Result;
use portcheck_core::{KillOutcome, ProcessReaper, ProcessTable, SignalSender};

pub async fn run<T: ProcessTable, S: SignalSender>(
    reaper: &ProcessReaper<T, S>,
    port: u16,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match reaper.kill(port).await {
        Ok(outcome) => render(&outcome, json, out, err),
        Err(e) => {
            writeln!(err, "❌ Error finding/killing process: {}", e)?;
            Ok(())
        }
    }
}

/// Print one line per process: successes to `out`, failures to `err`.
pub fn render(
    outcome: &KillOutcome,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
        return Ok(());
    }

    match outcome {
        KillOutcome::NoProcessFound { port } => {
            writeln!(out, "✅ No process found on port {}", port)?;
        }
        KillOutcome::Signaled { port, reports } => {
            for report in reports {
                match &report.result {
                    Ok(()) => writeln!(out, "🔪 Killed process PID {} on port {}", report.pid(), port)?,
                    Err(e) => writeln!(err, "❌ Failed to kill PID {}: {}", report.pid(), e)?,
                }
            }
        }
    }
    Ok(())
}
