//! port-check CLI - find busy ports and free them
//!
//! `--list` scans for ports held by a listening process,
//! `--kill <port>` terminates whatever holds a port.

mod commands;
mod logging;

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use portcheck_core::application::DEFAULT_CONCURRENCY;
use portcheck_core::{
    PlatformProcessTable, PlatformSignalSender, PortRange, ProcessReaper, ScanOptions, Signal,
};

const USAGE: &str = "
Usage:
  port-check --list           List all busy ports
  port-check --kill <port>    Kill process running on the specified port
";

const MISSING_PORT: &str =
    "❌ Please provide a port number to kill. Example: port-check --kill 3000";

#[derive(Parser, Debug)]
#[command(name = "port-check")]
#[command(author, version, about = "List busy ports and kill the process holding a port")]
struct Cli {
    /// List all busy ports
    #[arg(long)]
    list: bool,

    /// Kill process running on the specified port
    #[arg(long, value_name = "PORT", num_args = 0..=1)]
    kill: Option<Option<u16>>,

    /// Ports to scan with --list (START-END or a single PORT)
    #[arg(long, value_name = "RANGE", default_value = "1-65535")]
    range: PortRange,

    /// Maximum number of ports probed at once (0 for no limit)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Force kill (SIGKILL) instead of asking the process to exit
    #[arg(short, long)]
    force: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// What the invocation asks for, resolved from the flags.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    List(ScanOptions),
    Kill { port: u16, signal: Signal },
    /// `--kill` was given without a port.
    MissingPort,
    Usage,
}

impl Action {
    /// Process exit status. Only a missing kill port fails the invocation.
    fn exit_status(&self) -> u8 {
        match self {
            Action::MissingPort => 1,
            Action::List(_) | Action::Kill { .. } | Action::Usage => 0,
        }
    }
}

impl Cli {
    /// Parse the command line. Anything clap rejects falls back to the usage
    /// text; only help and version requests come back as errors.
    fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Err(e)
            }
            Err(_) => Self::try_parse_from(["port-check"]),
        }
    }

    /// `--list` wins over `--kill` when both are present.
    fn action(&self) -> Action {
        if self.list {
            return Action::List(ScanOptions {
                range: self.range,
                concurrency: self.concurrency,
            });
        }

        match self.kill {
            Some(Some(port)) => Action::Kill {
                port,
                signal: if self.force {
                    Signal::Kill
                } else {
                    Signal::Terminate
                },
            },
            Some(None) => Action::MissingPort,
            None => Action::Usage,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let action = cli.action();
    let status = action.exit_status();
    tracing::debug!(?action, status, "Dispatching");

    match action {
        Action::List(options) => {
            commands::list::run(options, cli.json, &mut out).await?;
        }
        Action::Kill { port, signal } => {
            let reaper = ProcessReaper::<PlatformProcessTable, PlatformSignalSender>::default()
                .with_signal(signal);
            commands::kill::run(&reaper, port, cli.json, &mut out, &mut err).await?;
        }
        Action::MissingPort => {
            writeln!(err, "{}", MISSING_PORT)?;
        }
        Action::Usage => {
            writeln!(out, "{}", USAGE)?;
        }
    }

    Ok(ExitCode::from(status))
}
