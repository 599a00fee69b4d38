//! Result table export: CSV encoding, file naming and summaries

mod error;
mod filename;
mod row;
mod summary;
mod writer;

pub use error::ExportError;
pub use filename::result_filename;
pub use row::{export_rows, ExportRow};
pub use summary::Summary;
pub use writer::{read_rows, save_results, to_csv_bytes, HEADERS};
