use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use triage_core::{ConfirmedRecord, DialogueItem, Session};

/// One exported result row, in the fixed column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub index: i64,
    pub evaluator_id: String,
    pub age: String,
    pub major: String,
    pub sub: String,
    pub triage_level: String,
    pub time_major_s: f64,
    pub time_sub_s: f64,
    pub time_triage_s: f64,
}

impl ExportRow {
    pub fn new(record: &ConfirmedRecord, item: Option<&DialogueItem>) -> Self {
        Self {
            index: record.item_id,
            evaluator_id: record.evaluator_id.clone(),
            age: item.map(|i| i.age.clone()).unwrap_or_default(),
            major: record.major.clone(),
            sub: record.sub.clone(),
            triage_level: record.triage.clone(),
            time_major_s: record.time_major,
            time_sub_s: record.time_sub,
            time_triage_s: record.time_triage,
        }
    }
}

/// Rows for every confirmed record, in original item order
pub fn export_rows(session: &Session) -> Vec<ExportRow> {
    let items: HashMap<i64, &DialogueItem> =
        session.items().iter().map(|item| (item.id, item)).collect();

    session
        .finalize()
        .iter()
        .map(|record| ExportRow::new(record, items.get(&record.item_id).copied()))
        .collect()
}
