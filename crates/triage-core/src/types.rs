//! Core types for dialogue annotation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Age marker used by the intake sheets for patients under 15
pub const PEDIATRIC_MARKER: &str = "15세 미만";
/// Age marker used by the intake sheets for patients 15 and over
pub const ADULT_MARKER: &str = "15세 이상";

/// Age bracket selecting which taxonomy table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Adult,
    Pediatric,
    /// Missing or unrecognized age value
    Unknown,
}

impl AgeBracket {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value == PEDIATRIC_MARKER
            || value.eq_ignore_ascii_case("pediatric")
            || value.eq_ignore_ascii_case("child")
        {
            AgeBracket::Pediatric
        } else if value == ADULT_MARKER || value.eq_ignore_ascii_case("adult") {
            AgeBracket::Adult
        } else {
            AgeBracket::Unknown
        }
    }

    /// Bracket used for taxonomy lookup; unknown ages use the adult table
    pub fn lookup(self) -> Self {
        match self {
            AgeBracket::Pediatric => AgeBracket::Pediatric,
            AgeBracket::Adult | AgeBracket::Unknown => AgeBracket::Adult,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgeBracket::Adult => "adult",
            AgeBracket::Pediatric => "pediatric",
            AgeBracket::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One utterance in a structured transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub utterance: String,
}

/// Dialogue transcript: a structured turn list or opaque text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transcript {
    Turns(Vec<Turn>),
    PlainText(String),
}

impl Transcript {
    /// Parse a stored transcript cell. JSON turn lists become `Turns`,
    /// anything that is not valid JSON is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Transcript>(raw) {
            Ok(transcript) => transcript,
            Err(_) => Transcript::PlainText(raw.to_string()),
        }
    }

    /// Number of turns (structured) or non-blank lines (plain text)
    pub fn turn_count(&self) -> usize {
        match self {
            Transcript::Turns(turns) => turns.len(),
            Transcript::PlainText(text) => text.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.turn_count() == 0
    }
}

/// A dialogue record to be annotated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueItem {
    pub id: i64,
    /// Age value as it appeared in the source table
    pub age: String,
    pub bracket: AgeBracket,
    pub transcript: Transcript,
    pub predicted_major: Option<String>,
    pub predicted_sub: Option<String>,
    pub predicted_triage: Option<String>,
    /// Majors offered when no taxonomy table applies
    #[serde(default)]
    pub fallback_majors: Vec<String>,
    /// Subs offered when the taxonomy has no entry for the chosen major
    #[serde(default)]
    pub fallback_subs: Vec<String>,
}

impl DialogueItem {
    pub fn new(id: i64, age: &str, transcript: Transcript) -> Self {
        Self {
            id,
            age: age.trim().to_string(),
            bracket: AgeBracket::parse(age),
            transcript,
            predicted_major: None,
            predicted_sub: None,
            predicted_triage: None,
            fallback_majors: Vec::new(),
            fallback_subs: Vec::new(),
        }
    }

    pub fn with_predictions(
        mut self,
        major: Option<String>,
        sub: Option<String>,
        triage: Option<String>,
    ) -> Self {
        self.predicted_major = non_blank(major);
        self.predicted_sub = non_blank(sub);
        self.predicted_triage = non_blank(triage);
        self
    }

    pub fn with_fallbacks(mut self, majors: Vec<String>, subs: Vec<String>) -> Self {
        self.fallback_majors = majors;
        self.fallback_subs = subs;
        self
    }

    /// Machine prediction for the given step, if one was recorded
    pub fn prediction_for(&self, step: Step) -> Option<&str> {
        let value = match step {
            Step::Major => &self.predicted_major,
            Step::Sub => &self.predicted_sub,
            Step::Triage => &self.predicted_triage,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Evaluation mode chosen at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Classification only
    Plain,
    /// Machine prediction shown next to each step
    Assisted,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Plain => "plain",
            Mode::Assisted => "assisted",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-step within one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Major,
    Sub,
    Triage,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Major, Step::Sub, Step::Triage];

    /// Strict 3-cycle: Major -> Sub -> Triage -> Major
    pub fn next(self) -> Self {
        match self {
            Step::Major => Step::Sub,
            Step::Sub => Step::Triage,
            Step::Triage => Step::Major,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Step::Major => 0,
            Step::Sub => 1,
            Step::Triage => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Major => "Major category",
            Step::Sub => "Sub category",
            Step::Triage => "KTAS level",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// KTAS triage level, 1 (most urgent) through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    Resuscitation,
    Emergency,
    Urgent,
    LessUrgent,
    NonUrgent,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 5] = [
        TriageLevel::Resuscitation,
        TriageLevel::Emergency,
        TriageLevel::Urgent,
        TriageLevel::LessUrgent,
        TriageLevel::NonUrgent,
    ];

    pub fn number(self) -> u8 {
        match self {
            TriageLevel::Resuscitation => 1,
            TriageLevel::Emergency => 2,
            TriageLevel::Urgent => 3,
            TriageLevel::LessUrgent => 4,
            TriageLevel::NonUrgent => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriageLevel::Resuscitation => "Level 1 - 즉각 소생 (Resuscitation)",
            TriageLevel::Emergency => "Level 2 - 긴급 (Emergency)",
            TriageLevel::Urgent => "Level 3 - 응급 (Urgent)",
            TriageLevel::LessUrgent => "Level 4 - 준응급 (Less Urgent)",
            TriageLevel::NonUrgent => "Level 5 - 비응급 (Non-Urgent)",
        }
    }

    /// The fixed option list shown at the triage step
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|l| l.label().to_string()).collect()
    }

    /// Match a stored label back to its level by its "Level N" prefix
    pub fn from_label(label: &str) -> Option<Self> {
        let rest = label.trim().strip_prefix("Level")?.trim_start();
        let digit = rest.chars().next()?.to_digit(10)?;
        Self::ALL.into_iter().find(|l| u32::from(l.number()) == digit)
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// In-progress answers for the item at the session pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub major: String,
    pub time_major: f64,
    pub sub: Option<String>,
    pub time_sub: Option<f64>,
}

/// A finished three-step annotation for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedRecord {
    pub item_id: i64,
    pub major: String,
    pub sub: String,
    pub triage: String,
    pub time_major: f64,
    pub time_sub: f64,
    pub time_triage: f64,
    pub evaluator_id: String,
}
