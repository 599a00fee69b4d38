//! Dialogue item tables (CSV or JSON Lines)

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use triage_core::{DialogueItem, Transcript};

use crate::error::LoadError;
use crate::io::{read_jsonl, read_table_text};
use crate::provider::ItemProvider;

// Accepted header names per column, English first, then the intake sheet's
const ID_COLUMNS: &[&str] = &["index", "id"];
const TRANSCRIPT_COLUMNS: &[&str] = &["transcript", "conversation", "챗GPT와 대화한 내용"];
const AGE_COLUMNS: &[&str] = &["age", "나이"];
const MAJOR_PREDICTION_COLUMNS: &[&str] = &["llm_major", "LLM_대분류"];
const SUB_PREDICTION_COLUMNS: &[&str] = &["llm_sub", "LLM_중분류"];
const TRIAGE_PREDICTION_COLUMNS: &[&str] = &["llm_ktas", "LLM_KTAS_level"];
const MAJOR_FALLBACK_COLUMNS: &[&str] = &["major_categories"];
const SUB_FALLBACK_COLUMNS: &[&str] = &["sub_categories"];

/// Item table on disk; the format follows the file extension
#[derive(Debug, Clone)]
pub struct ItemFile {
    path: PathBuf,
}

impl ItemFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemProvider for ItemFile {
    fn list_items(&self) -> Result<Vec<DialogueItem>, LoadError> {
        load_items(&self.path)
    }
}

/// Load dialogue items in file order. Fails if the file or its id or
/// transcript column is missing, or if an id repeats.
pub fn load_items(path: &Path) -> Result<Vec<DialogueItem>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let items = match extension.as_deref() {
        Some("csv") => load_csv_items(path)?,
        Some("jsonl") | Some("ndjson") => load_jsonl_items(path)?,
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id) {
            return Err(LoadError::DuplicateId {
                path: path.to_path_buf(),
                id: item.id,
            });
        }
    }

    tracing::info!(path = %path.display(), count = items.len(), "items loaded");
    Ok(items)
}

struct ItemColumns {
    id: usize,
    transcript: usize,
    age: Option<usize>,
    predicted_major: Option<usize>,
    predicted_sub: Option<usize>,
    predicted_triage: Option<usize>,
    fallback_majors: Option<usize>,
    fallback_subs: Option<usize>,
}

impl ItemColumns {
    fn resolve(headers: &csv::StringRecord, path: &Path) -> Result<Self, LoadError> {
        let required = |names: &[&str], column: &'static str| {
            find_column(headers, names).ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })
        };

        Ok(Self {
            id: required(ID_COLUMNS, "index")?,
            transcript: required(TRANSCRIPT_COLUMNS, "transcript")?,
            age: find_column(headers, AGE_COLUMNS),
            predicted_major: find_column(headers, MAJOR_PREDICTION_COLUMNS),
            predicted_sub: find_column(headers, SUB_PREDICTION_COLUMNS),
            predicted_triage: find_column(headers, TRIAGE_PREDICTION_COLUMNS),
            fallback_majors: find_column(headers, MAJOR_FALLBACK_COLUMNS),
            fallback_subs: find_column(headers, SUB_FALLBACK_COLUMNS),
        })
    }
}

pub(crate) fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn load_csv_items(path: &Path) -> Result<Vec<DialogueItem>, LoadError> {
    let content = read_table_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        row: 1,
        source,
    })?;
    let columns = ItemColumns::resolve(headers, path)?;

    let mut items = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is row 1
        let row = idx + 2;
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            row,
            source,
        })?;
        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let raw_id = record.get(columns.id).unwrap_or("");
        let id = parse_id(raw_id).ok_or_else(|| LoadError::InvalidId {
            path: path.to_path_buf(),
            row,
            value: raw_id.to_string(),
        })?;
        let transcript = Transcript::parse(record.get(columns.transcript).unwrap_or(""));
        let age = cell(columns.age).unwrap_or_default();

        let item = DialogueItem::new(id, &age, transcript)
            .with_predictions(
                cell(columns.predicted_major),
                cell(columns.predicted_sub),
                cell(columns.predicted_triage),
            )
            .with_fallbacks(
                parse_list(cell(columns.fallback_majors).as_deref()),
                parse_list(cell(columns.fallback_subs).as_deref()),
            );
        items.push(item);
    }

    Ok(items)
}

#[derive(Debug, Deserialize)]
struct JsonItem {
    #[serde(alias = "index")]
    id: i64,
    #[serde(alias = "conversation", alias = "챗GPT와 대화한 내용")]
    transcript: Transcript,
    #[serde(default, alias = "나이")]
    age: Option<String>,
    #[serde(default, alias = "LLM_대분류")]
    llm_major: Option<String>,
    #[serde(default, alias = "LLM_중분류")]
    llm_sub: Option<String>,
    #[serde(default, alias = "LLM_KTAS_level")]
    llm_ktas: Option<String>,
    #[serde(default)]
    major_categories: Vec<String>,
    #[serde(default)]
    sub_categories: Vec<String>,
}

fn load_jsonl_items(path: &Path) -> Result<Vec<DialogueItem>, LoadError> {
    let rows: Vec<JsonItem> = read_jsonl(path)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let transcript = match row.transcript {
                // A string cell may itself hold an encoded turn list
                Transcript::PlainText(text) => Transcript::parse(&text),
                turns => turns,
            };
            DialogueItem::new(row.id, row.age.as_deref().unwrap_or(""), transcript)
                .with_predictions(row.llm_major, row.llm_sub, row.llm_ktas)
                .with_fallbacks(
                    clean_list(row.major_categories),
                    clean_list(row.sub_categories),
                )
        })
        .collect())
}

/// Integer ids; spreadsheet exports sometimes write them as `7.0`
fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Option list cell: a JSON string array or `;`-separated values
fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return clean_list(list);
        }
    }
    raw.split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed entries, blanks dropped
fn clean_list(list: Vec<String>) -> Vec<String> {
    list.into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
