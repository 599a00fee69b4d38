use std::path::PathBuf;
use thiserror::Error;

/// Failure to load an item or category table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: file not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: row {row}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("{}: line {line}: {source}", .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: row {row}: invalid id '{value}'", .path.display())]
    InvalidId {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{}: duplicate id {id}", .path.display())]
    DuplicateId { path: PathBuf, id: i64 },

    #[error("{}: unsupported item file, expected .csv or .jsonl", .path.display())]
    UnsupportedFormat { path: PathBuf },
}
