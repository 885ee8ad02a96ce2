//! CSV output formatting.
//!
//! One row per open port; hosts without open ports are omitted.

use crate::report::ScanRecord;
use std::io::{self, Write};

/// Write open ports as `host,port,service,default_credentials` rows.
pub fn write_csv<W: Write>(record: &ScanRecord, out: &mut W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["host", "port", "service", "default_credentials"])?;

    for host in &record.hosts {
        for open in &host.open_ports {
            wtr.write_record([
                &host.host_address.to_string(),
                &open.port.to_string(),
                &open.service.to_string(),
                &open.default_credentials.map_or(String::new(), |ok| ok.to_string()),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
