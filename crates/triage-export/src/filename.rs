use chrono::NaiveDateTime;

use triage_core::Mode;

/// `evaluation_{evaluator}_{mode}_{YYYYmmdd_HHMMSS}.csv`
pub fn result_filename(evaluator_id: &str, mode: Mode, at: NaiveDateTime) -> String {
    format!(
        "evaluation_{}_{}_{}.csv",
        sanitize(evaluator_id),
        mode.as_str(),
        at.format("%Y%m%d_%H%M%S")
    )
}

// Evaluator ids are free text; keep them from escaping the results dir
fn sanitize(evaluator_id: &str) -> String {
    evaluator_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
