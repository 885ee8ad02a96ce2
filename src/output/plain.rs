//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::classifier::banner::sanitize_banner;
use crate::classifier::ServiceIdentity;
use crate::report::ScanRecord;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write results in human-readable plain text format.
pub fn write_plain<W: Write>(record: &ScanRecord, colors: bool, out: &mut W) -> io::Result<()> {
    let paint = |s: Style| s.force_styling(colors);
    let heading = paint(Style::new().cyan());
    let bold = paint(Style::new().bold());
    let dim = paint(Style::new().dim());

    writeln!(out)?;
    writeln!(out, "{}", heading.apply_to(RULE))?;
    writeln!(out, "                    {}", heading.apply_to("sweepd Scan Results"))?;
    writeln!(out, "{}", heading.apply_to(RULE))?;
    writeln!(out)?;

    writeln!(out, "  {} {}", bold.apply_to("Range:"), record.range)?;
    writeln!(out, "  {} {}", bold.apply_to("Scan ID:"), dim.apply_to(record.id.short()))?;
    writeln!(
        out,
        "  {} {} hosts, {} ports each, {:.2}s",
        bold.apply_to("Scanned:"),
        record.hosts.len(),
        record.ports.len(),
        record.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "  {} {} live hosts, {} open ports",
        bold.apply_to("Found:"),
        paint(Style::new().green().bold()).apply_to(record.live_hosts()),
        record.open_port_count()
    )?;
    if record.interrupted {
        writeln!(
            out,
            "  {}",
            paint(Style::new().yellow().bold()).apply_to("Scan interrupted: results are partial.")
        )?;
    }
    writeln!(out)?;

    let live: Vec<_> = record.hosts.iter().filter(|h| h.has_open_ports()).collect();
    if live.is_empty() {
        writeln!(out, "  {}", dim.apply_to("No open ports found."))?;
    }

    for host in live {
        writeln!(out, "  {}", bold.apply_to(host.host_address))?;
        writeln!(out, "  {}", dim.apply_to(THIN_RULE))?;
        writeln!(
            out,
            "  {:>6}  {:<40}  {}",
            bold.apply_to("PORT"),
            bold.apply_to("SERVICE"),
            bold.apply_to("CREDENTIALS")
        )?;

        for open in &host.open_ports {
            let service = service_label(&open.service);
            let service_style = match open.service {
                ServiceIdentity::Recognized(_) => Style::new().green().bold(),
                ServiceIdentity::TransportDiagnostic(_) => Style::new().red(),
                _ => Style::new().yellow(),
            };
            let credentials = match open.default_credentials {
                Some(true) => paint(Style::new().red().bold()).apply_to("default accepted"),
                Some(false) => dim.apply_to("rejected"),
                None => dim.apply_to(""),
            };

            writeln!(
                out,
                "  {:>6}  {:<40}  {}",
                open.port,
                paint(service_style).apply_to(service),
                credentials
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", heading.apply_to(RULE))?;
    Ok(())
}

/// Single-line service label; banner text is sanitized and shortened.
fn service_label(service: &ServiceIdentity) -> String {
    match service {
        ServiceIdentity::BannerFallback(text) => {
            format!("Banner Detected: {}", truncate_string(&sanitize_banner(text), 23))
        }
        other => other.to_string(),
    }
}

/// Print a header before scanning begins.
pub fn print_scan_header(range: &str, hosts: u64, ports: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("sweepd").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Range: {} ({} hosts)",
        style("•").dim(),
        style(range).white().bold(),
        hosts
    );
    eprintln!(
        "{} Probing {} ports per host...",
        style("•").dim(),
        style(ports).white().bold()
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding an ellipsis.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
