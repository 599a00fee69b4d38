//! Category tables: one sub-table per age bracket

use std::path::{Path, PathBuf};

use triage_core::{AgeBracket, CategoryTable, Taxonomy};

use crate::error::LoadError;
use crate::io::read_table_text;
use crate::items::find_column;
use crate::provider::TaxonomyProvider;

const MAJOR_COLUMNS: &[&str] = &["major", "대분류"];
const SUB_COLUMNS: &[&str] = &["sub", "중분류"];

// Sub-table file names per bracket, English first, then the workbook's sheet names
const ADULT_TABLES: &[&str] = &["adult.csv", "성인.csv"];
const PEDIATRIC_TABLES: &[&str] = &["pediatric.csv", "소아.csv"];

/// Directory holding the adult and pediatric category tables
#[derive(Debug, Clone)]
pub struct CategoryDir {
    dir: PathBuf,
}

impl CategoryDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn find_table(&self, names: &[&str]) -> Option<PathBuf> {
        names
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.is_file())
    }
}

impl TaxonomyProvider for CategoryDir {
    /// `Ok(None)` when the directory or both tables are missing
    fn lookup_categories(&self) -> Result<Option<Taxonomy>, LoadError> {
        if !self.dir.is_dir() {
            tracing::warn!(dir = %self.dir.display(), "category directory not found");
            return Ok(None);
        }

        let mut taxonomy = Taxonomy::new();
        let mut found = false;
        for (bracket, names) in [
            (AgeBracket::Adult, ADULT_TABLES),
            (AgeBracket::Pediatric, PEDIATRIC_TABLES),
        ] {
            let Some(path) = self.find_table(names) else {
                tracing::warn!(bracket = %bracket, "no category table for bracket");
                continue;
            };
            if let Some(table) = load_category_table(&path)? {
                tracing::info!(
                    bracket = %bracket,
                    majors = table.len(),
                    path = %path.display(),
                    "category table loaded"
                );
                taxonomy.set(bracket, table);
                found = true;
            }
        }

        Ok(found.then_some(taxonomy))
    }
}

/// Load one `major,sub` table; `Ok(None)` if the file does not exist
pub fn load_category_table(path: &Path) -> Result<Option<CategoryTable>, LoadError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = read_table_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        row: 1,
        source,
    })?;
    let missing = |column: &'static str| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column,
    };
    let major_col = find_column(headers, MAJOR_COLUMNS).ok_or_else(|| missing("major"))?;
    let sub_col = find_column(headers, SUB_COLUMNS).ok_or_else(|| missing("sub"))?;

    let mut table = CategoryTable::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            row: idx + 2,
            source,
        })?;
        table.insert(
            record.get(major_col).unwrap_or(""),
            record.get(sub_col).unwrap_or(""),
        );
    }

    Ok(Some(table))
}
