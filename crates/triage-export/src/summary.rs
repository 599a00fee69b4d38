use std::collections::BTreeMap;
use std::fmt;

use triage_core::TriageLevel;

use crate::row::ExportRow;

/// Completion count plus the most frequent major and triage answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub total: usize,
    pub top_major: Option<String>,
    pub top_triage: Option<String>,
}

impl Summary {
    pub fn from_rows(rows: &[ExportRow], total: usize) -> Self {
        Self {
            completed: rows.len(),
            total,
            top_major: mode(rows.iter().map(|r| r.major.as_str())),
            top_triage: mode(rows.iter().map(|r| triage_key(&r.triage_level))),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluation Summary")?;
        writeln!(f, "==================")?;
        writeln!(f, "Completed: {} / {}", self.completed, self.total)?;
        writeln!(
            f,
            "Most common major: {}",
            self.top_major.as_deref().unwrap_or("-")
        )?;
        write!(
            f,
            "Most common KTAS: {}",
            self.top_triage.as_deref().unwrap_or("-")
        )
    }
}

// Short and full spellings of one level count together
fn triage_key(value: &str) -> &str {
    TriageLevel::from_label(value).map_or(value, |level| level.label())
}

/// Most frequent value; ties go to the smallest value
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
