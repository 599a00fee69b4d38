use std::path::Path;

use triage_export::{read_rows, Summary};

pub fn run(file: &Path, total: Option<usize>) -> anyhow::Result<()> {
    let summary = summarize(file, total)?;
    println!("{summary}");
    Ok(())
}

fn summarize(file: &Path, total: Option<usize>) -> anyhow::Result<Summary> {
    let rows = read_rows(file)?;
    let total = total.unwrap_or(rows.len());
    if rows.len() > total {
        tracing::warn!(rows = rows.len(), total, "more rows than the stated total");
    }
    Ok(Summary::from_rows(&rows, total))
}
