//! Output formatting module.
//!
//! Renders a [`ScanRecord`] as plain text, JSON, or CSV into any writer.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, print_warning, write_plain};

use crate::cli::OutputFormat;
use crate::report::ScanRecord;
use std::io::{self, Write};

/// Render `record` in `format`. `colors` only affects plain text.
pub fn write_results<W: Write>(
    record: &ScanRecord,
    format: OutputFormat,
    colors: bool,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(record, colors, out),
        OutputFormat::Json => write_json(record, out),
        OutputFormat::Csv => write_csv(record, out),
    }
}
