use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use sweepd::cli::{Args, OutputFormat};
use sweepd::config::AppSettings;
use sweepd::error::CliResult;
use sweepd::output::{print_error, print_scan_header, print_warning, write_results};
use sweepd::{run_scan, NetworkRange, NetworkScanner, PortSpec};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = match &args.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().unwrap_or_else(|e| {
            print_warning(&format!("{e}; using built-in defaults"));
            AppSettings::default()
        }),
    };

    if let Err(e) = run(args, settings).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args, settings: AppSettings) -> CliResult<()> {
    let range: NetworkRange = args.range.parse()?;
    let ports = args.port_list(&settings).parse::<PortSpec>()?.to_ports();
    let config = args.scan_config(&settings);
    debug!(?config, "scan configuration");

    if args.output == OutputFormat::Plain && !config.verbose {
        print_scan_header(&range.to_string(), range.host_count(), ports.len());
    }

    let scanner = NetworkScanner::new(config)?;

    let token = scanner.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping scan");
            token.cancel();
        }
    });

    let record = run_scan(&scanner, range, ports).await;

    match &args.out {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            write_results(&record, args.output, false, &mut out)?;
            out.flush()?;
            info!(path = %path.display(), "results written");
        }
        None => {
            let colors = console::colors_enabled();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_results(&record, args.output, colors, &mut out)?;
            out.flush()?;
        }
    }

    if record.interrupted {
        print_warning(&format!(
            "scan interrupted after {} of {} hosts",
            record.hosts.len(),
            record.range.host_count()
        ));
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
