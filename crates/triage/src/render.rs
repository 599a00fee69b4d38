//! Plain-text transcript view for the terminal

use regex::Regex;
use std::sync::OnceLock;

use triage_core::{Transcript, Turn};

static SPEAKER_LINE_RE: OnceLock<Regex> = OnceLock::new();

const PATIENT_INDENT: &str = "        ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Speaker {
    Interviewer,
    Patient,
    Other(String),
}

impl Speaker {
    fn from_turn(speaker: &str) -> Self {
        match speaker.trim() {
            "I" => Speaker::Interviewer,
            "CHATGPT" => Speaker::Patient,
            other => Speaker::Other(other.to_string()),
        }
    }

    fn from_line_label(label: &str) -> Self {
        match label.trim() {
            "의사" | "Doctor" | "I" => Speaker::Interviewer,
            "환자" | "Patient" | "CHATGPT" => Speaker::Patient,
            other => Speaker::Other(other.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Speaker::Interviewer => "Interviewer",
            Speaker::Patient => "Patient",
            Speaker::Other(label) => label,
        }
    }
}

fn format_entry(speaker: &Speaker, turn: Option<u32>, text: &str) -> String {
    let indent = if *speaker == Speaker::Patient {
        PATIENT_INDENT
    } else {
        ""
    };
    let label = match (speaker.label(), turn) {
        ("", _) => String::new(),
        (label, Some(turn)) => format!("[{label} · Turn {turn}] "),
        (label, None) => format!("[{label}] "),
    };
    format!("{indent}{label}{text}")
}

fn render_turn(turn: &Turn) -> String {
    let speaker = Speaker::from_turn(&turn.speaker);
    // Turn numbers start at 1; 0 means the source had none
    let number = Some(turn.turn).filter(|&n| n > 0);
    format_entry(&speaker, number, turn.utterance.trim())
}

fn render_line(line: &str) -> String {
    let re = SPEAKER_LINE_RE.get_or_init(|| Regex::new(r"^([^:]+):\s*(.*)$").unwrap());
    match re.captures(line) {
        Some(caps) => {
            let speaker = Speaker::from_line_label(&caps[1]);
            format_entry(&speaker, None, caps[2].trim())
        }
        None => line.to_string(),
    }
}

/// Render a transcript one utterance per line; patient lines are indented
pub fn render_transcript(transcript: &Transcript) -> String {
    let lines: Vec<String> = match transcript {
        Transcript::Turns(turns) => turns.iter().map(render_turn).collect(),
        Transcript::PlainText(text) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(render_line)
            .collect(),
    };
    lines.join("\n")
}
