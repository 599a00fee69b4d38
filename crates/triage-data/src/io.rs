//! File reading helpers and atomic writes

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::LoadError;

const UTF8_BOM: char = '\u{feff}';

/// Read a text table, stripping a leading byte-order mark
pub fn read_table_text(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Read all records from a JSONL file. Blank lines are skipped; a
/// malformed line fails the whole read.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let content = read_table_text(path)?;
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
