use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use portsweep::catalog::{ServiceCatalog, DEFAULT_CATALOG_FILE};
use portsweep::types::{ScanEvent, ScanRequest};
use portsweep::{report, resolve, scanner};

/// portsweep — concurrent TCP connect scanner for a single host.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "portsweep",
    version,
    about = "Concurrent TCP connect scanner for a single host.",
    long_about = None
)]
struct Cli {
    /// Hostname or IPv4 address to scan.
    target: String,

    /// Port number to scan from.
    #[arg(
        long = "fp",
        visible_alias = "from-port",
        value_name = "PORT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    from_port: u16,

    /// Port number to scan to.
    #[arg(
        long = "tp",
        visible_alias = "to-port",
        value_name = "PORT",
        default_value_t = 65535,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    to_port: u16,

    /// Timeout for each connection in milliseconds.
    #[arg(
        short = 't',
        long = "timeout",
        value_name = "MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Range check before any network activity; resolution comes after.
    if cli.from_port > cli.to_port {
        bail!(
            "--fp {} cannot be higher than --tp {}",
            cli.from_port,
            cli.to_port
        );
    }

    let addr = resolve::resolve_ipv4(&cli.target).await?;
    log::debug!("resolved {} to {}", cli.target, addr);

    let request = ScanRequest::new(
        addr,
        cli.from_port,
        cli.to_port,
        Duration::from_millis(cli.timeout_ms),
    )?;

    let catalog = Arc::new(ServiceCatalog::load_or_default(DEFAULT_CATALOG_FILE));
    log::debug!("service catalog holds {} entries", catalog.len());

    println!("{}\n", report::banner(&cli.target, &request));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\n{}\n", report::abort_notice());
                cancel.cancel();
            }
        });
    }

    let started_at = OffsetDateTime::now_utc();
    let clock = Instant::now();

    let (events, mut rx) = mpsc::unbounded_channel();
    let scan = tokio::spawn(scanner::scan_range(request, catalog, cancel, events));

    // Single consumer for all scan output, so lines never interleave. The
    // channel closes once the scheduler and its last probe task are done.
    while let Some(event) = rx.recv().await {
        match event {
            ScanEvent::Port(result) => println!("{}", report::port_line(&result)),
            ScanEvent::Progress {
                finished,
                total,
                remaining,
            } => println!("{}", report::progress_line(finished, total, remaining)),
        }
    }

    let summary = scan.await?;
    let ended_at = OffsetDateTime::now_utc();

    println!(
        "\n{}",
        report::summary(&summary, started_at, ended_at, clock.elapsed())
    );

    Ok(())
}
