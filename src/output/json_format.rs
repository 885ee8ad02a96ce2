//! JSON output formatting.

use crate::report::ScanRecord;
use std::io::{self, Write};

/// Write the record as pretty-printed JSON.
pub fn write_json<W: Write>(record: &ScanRecord, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, record).map_err(io::Error::other)?;
    writeln!(out)
}
