//! Two-level category taxonomy keyed by age bracket

use serde::{Deserialize, Serialize};

use crate::types::AgeBracket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CategoryEntry {
    major: String,
    subs: Vec<String>,
}

/// Major -> ordered unique subs, preserving first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a (major, sub) row. Repeated subs under one major are ignored.
    pub fn insert(&mut self, major: &str, sub: &str) {
        let major = major.trim();
        let sub = sub.trim();
        if major.is_empty() {
            return;
        }

        let pos = match self.entries.iter().position(|e| e.major == major) {
            Some(pos) => pos,
            None => {
                self.entries.push(CategoryEntry {
                    major: major.to_string(),
                    subs: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        let subs = &mut self.entries[pos].subs;
        if !sub.is_empty() && !subs.iter().any(|s| s == sub) {
            subs.push(sub.to_string());
        }
    }

    pub fn majors(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.major.clone()).collect()
    }

    pub fn subs(&self, major: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.major == major)
            .map(|e| e.subs.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for CategoryTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = CategoryTable::new();
        for (major, sub) in iter {
            table.insert(major, sub);
        }
        table
    }
}

/// Adult and pediatric category tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    adult: Option<CategoryTable>,
    #[serde(default)]
    pediatric: Option<CategoryTable>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, bracket: AgeBracket, table: CategoryTable) {
        match bracket.lookup() {
            AgeBracket::Pediatric => self.pediatric = Some(table),
            _ => self.adult = Some(table),
        }
    }

    pub fn with(mut self, bracket: AgeBracket, table: CategoryTable) -> Self {
        self.set(bracket, table);
        self
    }

    /// Table for an item's bracket. Unknown brackets resolve to adult;
    /// an empty table counts as absent.
    pub fn table(&self, bracket: AgeBracket) -> Option<&CategoryTable> {
        let table = match bracket.lookup() {
            AgeBracket::Pediatric => self.pediatric.as_ref(),
            _ => self.adult.as_ref(),
        };
        table.filter(|t| !t.is_empty())
    }

    /// True when neither bracket has any categories
    pub fn is_empty(&self) -> bool {
        self.table(AgeBracket::Adult).is_none() && self.table(AgeBracket::Pediatric).is_none()
    }
}
