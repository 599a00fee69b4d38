//! CSV encoding of result rows

use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::row::ExportRow;

/// Column header, matching `ExportRow` field order
pub const HEADERS: [&str; 9] = [
    "index",
    "evaluator_id",
    "age",
    "major",
    "sub",
    "triage_level",
    "time_major_s",
    "time_sub_s",
    "time_triage_s",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encode rows as BOM-prefixed UTF-8 CSV. The header row is always
/// written, even when there are no rows.
pub fn to_csv_bytes(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Write encoded results into `dir/filename`, returning the final path
pub fn save_results(dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(filename);
    triage_data::atomic_write(&path, data)?;
    tracing::info!(path = %path.display(), bytes = data.len(), "results saved");
    Ok(path)
}

/// Read a previously exported result file
pub fn read_rows(path: &Path) -> Result<Vec<ExportRow>, ExportError> {
    let content = triage_data::read_table_text(path)?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<ExportRow>, csv::Error>>()?;
    Ok(rows)
}
