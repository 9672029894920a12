//! CSV audit trail of the bridges a repair run added.
//!
//! One row per bridge, in the order added:
//!
//! `id, connection, from_x, from_y, to_x, to_y, distance, joins_a, joins_b, corridor`
//!
//! `joins_*` are component indices for component connectors and corridor
//! indices for near-miss bridges.

use std::io;
use std::path::Path;

use csv::Writer;

use crate::bridge::Bridge;
use crate::RepairResult;

const HEADER: [&str; 10] = [
    "id", "connection", "from_x", "from_y", "to_x", "to_y", "distance", "joins_a", "joins_b", "corridor",
];

/// Write the audit CSV to `path`, creating or truncating it.
pub fn write_audit_csv(path: &Path, bridges: &[Bridge]) -> RepairResult<()> {
    let mut writer = Writer::from_path(path)?;
    write_rows(&mut writer, bridges)
}

/// Write the audit CSV to any writer.
pub fn write_audit<W: io::Write>(out: W, bridges: &[Bridge]) -> RepairResult<()> {
    let mut writer = Writer::from_writer(out);
    write_rows(&mut writer, bridges)
}

fn write_rows<W: io::Write>(writer: &mut Writer<W>, bridges: &[Bridge]) -> RepairResult<()> {
    writer.write_record(HEADER)?;
    for b in bridges {
        let (ja, jb) = b.joins();
        writer.write_record(&[
            b.feature_id(),
            b.kind.tag().to_string(),
            b.from.x.to_string(),
            b.from.y.to_string(),
            b.to.x.to_string(),
            b.to.y.to_string(),
            b.distance.to_string(),
            ja.to_string(),
            jb.to_string(),
            b.corridor.index().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
