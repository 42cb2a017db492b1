//! Example: Scan a port range and show who holds each busy port.
//!
//! Usage: cargo run --example scan_ports -- 3000-3100

use portcheck_core::{PlatformProcessTable, PortRange, ProcessTable};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let range: PortRange = match std::env::args().nth(1).map(|arg| arg.parse()) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        None => PortRange::new(1, 10_000).unwrap_or_default(),
    };

    println!("Scanning ports {}...\n", range);

    let busy = portcheck_core::scan_ports(range).await;

    if busy.is_empty() {
        println!("No busy ports found.");
        return;
    }

    let table = PlatformProcessTable::new();

    println!("{:<6} {:<8} {}", "PORT", "PID", "PROCESS");
    println!("{}", "-".repeat(40));

    for &port in &busy {
        match table.processes_on_port(port).await {
            Ok(handles) if handles.is_empty() => println!("{:<6} {:<8} {}", port, "-", "(unknown)"),
            Ok(handles) => {
                for handle in handles {
                    println!(
                        "{:<6} {:<8} {}",
                        port,
                        handle.pid,
                        handle.name.as_deref().unwrap_or("-")
                    );
                }
            }
            Err(e) => println!("{:<6} {:<8} error: {}", port, "-", e),
        }
    }

    println!("\nTotal: {} busy ports", busy.len());
}
