//! Three-step annotation session

use std::collections::{HashMap, HashSet};

use crate::error::SessionError;
use crate::taxonomy::Taxonomy;
use crate::types::{
    ConfirmedRecord, DialogueItem, Mode, PendingSelection, Step, TriageLevel,
};

/// State that exists only between `start` and `reset`
#[derive(Debug, Clone)]
struct ActiveState {
    evaluator_id: String,
    mode: Mode,
    pointer: usize,
    step: Step,
    pending: Option<PendingSelection>,
    confirmed: HashMap<i64, ConfirmedRecord>,
}

/// Single-evaluator annotation session over a fixed item list.
///
/// Each item is walked Major -> Sub -> Triage. Nothing is recorded for an
/// item until its triage step is confirmed, and confirmed fields are never
/// edited in place; re-annotating an item replaces its record.
#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<DialogueItem>,
    taxonomy: Option<Taxonomy>,
    state: Option<ActiveState>,
}

impl Session {
    pub fn new(items: Vec<DialogueItem>, taxonomy: Option<Taxonomy>) -> Self {
        if taxonomy.as_ref().map_or(true, Taxonomy::is_empty) {
            tracing::warn!("no taxonomy loaded, options fall back to per-item lists");
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                tracing::warn!(item_id = item.id, "duplicate item id, results keep one row");
            }
        }
        Self {
            items,
            taxonomy,
            state: None,
        }
    }

    /// Begin a fresh walk at `start_index`, discarding any earlier results
    pub fn start(
        &mut self,
        evaluator_id: &str,
        mode: Mode,
        start_index: usize,
    ) -> Result<(), SessionError> {
        let evaluator_id = evaluator_id.trim();
        if evaluator_id.is_empty() {
            return Err(SessionError::InvalidInput(
                "evaluator id must not be blank".to_string(),
            ));
        }
        if start_index >= self.items.len() {
            return Err(SessionError::InvalidInput(format!(
                "start index {} out of range (0..{})",
                start_index,
                self.items.len()
            )));
        }

        tracing::info!(
            evaluator = evaluator_id,
            mode = mode.as_str(),
            start_index,
            total = self.items.len(),
            "session started"
        );

        self.state = Some(ActiveState {
            evaluator_id: evaluator_id.to_string(),
            mode,
            pointer: start_index,
            step: Step::Major,
            pending: None,
            confirmed: HashMap::new(),
        });
        Ok(())
    }

    /// Drop all session state, as if `start` had never been called
    pub fn reset(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::info!(
                evaluator = state.evaluator_id.as_str(),
                discarded = state.confirmed.len(),
                "session reset"
            );
        }
    }

    /// Move the pointer to `index` so that item can be annotated again.
    /// Only allowed between items: once a major is chosen the current item
    /// must be finished first. Confirmed records are kept.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        let total = self.items.len();
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SessionError::InvalidState("session not started".to_string()))?;
        if index >= total {
            return Err(SessionError::InvalidInput(format!(
                "item index {} out of range (0..{})",
                index, total
            )));
        }

        if state.pending.is_some() {
            return Err(SessionError::InvalidState(
                "finish the current item before moving".to_string(),
            ));
        }

        tracing::debug!(from = state.pointer, to = index, "pointer moved");
        state.pointer = index;
        state.step = Step::Major;
        Ok(())
    }

    /// Options valid for the current step; empty once complete
    pub fn current_options(&self) -> Vec<String> {
        let (Some(state), Some(item)) = (self.state.as_ref(), self.current_item()) else {
            return Vec::new();
        };

        let table = self
            .taxonomy
            .as_ref()
            .and_then(|t| t.table(item.bracket));

        match state.step {
            Step::Major => match table {
                Some(table) => table.majors(),
                None => item.fallback_majors.clone(),
            },
            Step::Sub => {
                let major = state.pending.as_ref().map(|p| p.major.as_str());
                match (table, major) {
                    (Some(table), Some(major)) => match table.subs(major) {
                        Some(subs) => subs.to_vec(),
                        None => {
                            tracing::debug!(
                                item_id = item.id,
                                major,
                                "major not in taxonomy, using item sub list"
                            );
                            item.fallback_subs.clone()
                        }
                    },
                    _ => item.fallback_subs.clone(),
                }
            }
            Step::Triage => TriageLevel::labels(),
        }
    }

    /// Confirm `selected` for the current step and advance.
    ///
    /// Fails without touching any state when the session is not running,
    /// already complete, or nothing was selected.
    pub fn confirm_step(
        &mut self,
        selected: Option<&str>,
        elapsed_secs: f64,
    ) -> Result<Step, SessionError> {
        let total = self.items.len();
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SessionError::InvalidState("session not started".to_string()))?;
        if state.pointer >= total {
            return Err(SessionError::InvalidState(
                "all items already annotated".to_string(),
            ));
        }
        let value = selected
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SessionError::InvalidState("no option selected".to_string()))?
            .to_string();
        let item_id = self.items[state.pointer].id;

        match state.step {
            Step::Major => {
                state.pending = Some(PendingSelection {
                    major: value,
                    time_major: elapsed_secs,
                    sub: None,
                    time_sub: None,
                });
            }
            Step::Sub => {
                let pending = state.pending.as_mut().ok_or_else(|| {
                    SessionError::InvalidState("no major selected for this item".to_string())
                })?;
                pending.sub = Some(value);
                pending.time_sub = Some(elapsed_secs);
            }
            Step::Triage => {
                let (major, sub, time_major, time_sub) = match state.pending.as_ref() {
                    Some(PendingSelection {
                        major,
                        time_major,
                        sub: Some(sub),
                        time_sub: Some(time_sub),
                    }) => (major.clone(), sub.clone(), *time_major, *time_sub),
                    _ => {
                        return Err(SessionError::InvalidState(
                            "major and sub must be confirmed before triage".to_string(),
                        ))
                    }
                };

                let record = ConfirmedRecord {
                    item_id,
                    major,
                    sub,
                    triage: value,
                    time_major,
                    time_sub,
                    time_triage: elapsed_secs,
                    evaluator_id: state.evaluator_id.clone(),
                };
                if state.confirmed.insert(item_id, record).is_some() {
                    tracing::debug!(item_id, "existing record replaced");
                }
                state.pending = None;
                state.pointer += 1;
            }
        }

        let from = state.step;
        state.step = from.next();
        tracing::debug!(item_id, from = %from, to = %state.step, elapsed_secs, "step confirmed");
        Ok(state.step)
    }

    /// (confirmed records, total items); pending work is not counted
    pub fn progress(&self) -> (usize, usize) {
        let done = self.state.as_ref().map_or(0, |s| s.confirmed.len());
        (done, self.items.len())
    }

    /// Confirmed records in original item order, one per id. Items without
    /// a record are skipped, so this is safe to call mid-walk.
    pub fn finalize(&self) -> Vec<ConfirmedRecord> {
        let Some(state) = self.state.as_ref() else {
            return Vec::new();
        };
        let mut emitted = HashSet::new();
        self.items
            .iter()
            .filter(|item| emitted.insert(item.id))
            .filter_map(|item| state.confirmed.get(&item.id).cloned())
            .collect()
    }

    /// Machine prediction for the current step, shown only in assisted mode
    pub fn current_prediction(&self) -> Option<&str> {
        let state = self.state.as_ref()?;
        if state.mode != Mode::Assisted {
            return None;
        }
        self.current_item()?.prediction_for(state.step)
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.pointer >= self.items.len())
    }

    pub fn current_item(&self) -> Option<&DialogueItem> {
        self.state
            .as_ref()
            .and_then(|s| self.items.get(s.pointer))
    }

    pub fn current_step(&self) -> Option<Step> {
        self.state.as_ref().map(|s| s.step)
    }

    pub fn pointer(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.pointer)
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.state.as_ref().and_then(|s| s.pending.as_ref())
    }

    pub fn confirmed(&self, item_id: i64) -> Option<&ConfirmedRecord> {
        self.state.as_ref().and_then(|s| s.confirmed.get(&item_id))
    }

    pub fn evaluator_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.evaluator_id.as_str())
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.as_ref().map(|s| s.mode)
    }

    pub fn items(&self) -> &[DialogueItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::CategoryTable;
    use crate::types::{AgeBracket, Transcript};

    fn item(id: i64, age: &str) -> DialogueItem {
        DialogueItem::new(id, age, Transcript::PlainText(format!("dialogue {id}")))
    }

    fn scenario_taxonomy() -> Taxonomy {
        let adult: CategoryTable = [
            ("Chest Pain", "Cardiac"),
            ("Chest Pain", "Musculoskeletal"),
        ]
        .into_iter()
        .collect();
        let pediatric: CategoryTable = [("Fever", "Viral"), ("Fever", "Bacterial")]
            .into_iter()
            .collect();
        Taxonomy::new()
            .with(AgeBracket::Adult, adult)
            .with(AgeBracket::Pediatric, pediatric)
    }

    fn scenario_session() -> Session {
        Session::new(
            vec![item(7, "adult"), item(9, "pediatric")],
            Some(scenario_taxonomy()),
        )
    }

    fn annotate(session: &mut Session, major: &str, sub: &str, triage: &str) {
        session.confirm_step(Some(major), 1.0).unwrap();
        session.confirm_step(Some(sub), 1.0).unwrap();
        session.confirm_step(Some(triage), 1.0).unwrap();
    }

    #[test]
    fn test_start_rejects_blank_evaluator() {
        let mut session = scenario_session();
        let err = session.start("   ", Mode::Plain, 0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert!(!session.is_started());
    }

    #[test]
    fn test_start_rejects_out_of_range_index() {
        let mut session = scenario_session();
        let err = session.start("E1", Mode::Plain, 2).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput(_)));
    }

    #[test]
    fn test_start_then_progress_is_zero() {
        for start in 0..2 {
            let mut session = scenario_session();
            session.start("E1", Mode::Plain, start).unwrap();
            assert_eq!(session.progress(), (0, 2));
            assert_eq!(session.pointer(), Some(start));
            assert_eq!(session.current_step(), Some(Step::Major));
        }
    }

    #[test]
    fn test_start_trims_evaluator_and_clears_previous_results() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 1");
        assert_eq!(session.progress(), (1, 2));

        session.start("  E2 ", Mode::Assisted, 1).unwrap();
        assert_eq!(session.evaluator_id(), Some("E2"));
        assert_eq!(session.progress(), (0, 2));
        assert!(session.finalize().is_empty());
    }

    #[test]
    fn test_scenario_walkthrough() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();
        assert_eq!(session.current_options(), vec!["Chest Pain"]);

        assert_eq!(session.confirm_step(Some("Chest Pain"), 3.2).unwrap(), Step::Sub);
        assert_eq!(
            session.current_options(),
            vec!["Cardiac", "Musculoskeletal"]
        );

        assert_eq!(session.confirm_step(Some("Cardiac"), 1.1).unwrap(), Step::Triage);
        assert_eq!(session.current_options(), TriageLevel::labels());

        assert_eq!(
            session.confirm_step(Some("Level 3 - Urgent"), 2.0).unwrap(),
            Step::Major
        );
        assert_eq!(session.progress(), (1, 2));
        assert_eq!(
            session.confirmed(7),
            Some(&ConfirmedRecord {
                item_id: 7,
                major: "Chest Pain".to_string(),
                sub: "Cardiac".to_string(),
                triage: "Level 3 - Urgent".to_string(),
                time_major: 3.2,
                time_sub: 1.1,
                time_triage: 2.0,
                evaluator_id: "E1".to_string(),
            })
        );

        // Second item is pediatric
        assert_eq!(session.current_options(), vec!["Fever"]);
    }

    #[test]
    fn test_pending_never_counted_as_confirmed() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();
        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();
        session.confirm_step(Some("Cardiac"), 1.0).unwrap();

        assert_eq!(session.progress(), (0, 2));
        assert!(session.confirmed(7).is_none());
        assert!(session.finalize().is_empty());
        assert_eq!(session.pending().unwrap().sub.as_deref(), Some("Cardiac"));
    }

    #[test]
    fn test_confirm_without_selection_leaves_state_untouched() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();

        for selected in [None, Some(""), Some("  ")] {
            let err = session.confirm_step(selected, 1.0).unwrap_err();
            assert!(matches!(err, SessionError::InvalidState(_)));
            assert_eq!(session.pointer(), Some(0));
            assert_eq!(session.current_step(), Some(Step::Major));
            assert!(session.pending().is_none());
        }

        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();
        let before = session.pending().cloned();
        assert!(session.confirm_step(None, 5.0).is_err());
        assert_eq!(session.pending().cloned(), before);
        assert_eq!(session.current_step(), Some(Step::Sub));
    }

    #[test]
    fn test_confirm_before_start_fails() {
        let mut session = scenario_session();
        let err = session.confirm_step(Some("Chest Pain"), 1.0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
    }

    #[test]
    fn test_complete_session_rejects_confirm() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 1).unwrap();
        annotate(&mut session, "Fever", "Viral", "Level 4");

        assert!(session.is_complete());
        assert!(session.current_options().is_empty());
        assert!(session.current_item().is_none());
        let err = session.confirm_step(Some("Fever"), 1.0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
        assert_eq!(session.progress(), (1, 2));
    }

    #[test]
    fn test_reannotation_overwrites() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 2");

        session.jump_to(0).unwrap();
        annotate(&mut session, "Chest Pain", "Musculoskeletal", "Level 5");

        assert_eq!(session.progress(), (1, 2));
        let rows = session.finalize();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sub, "Musculoskeletal");
        assert_eq!(rows[0].triage, "Level 5");
    }

    #[test]
    fn test_jump_rejected_mid_item() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();
        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();

        for target in [0, 1] {
            let err = session.jump_to(target).unwrap_err();
            assert!(matches!(err, SessionError::InvalidState(_)));
        }
        assert_eq!(session.current_step(), Some(Step::Sub));
        assert_eq!(session.pending().unwrap().major, "Chest Pain");

        // The chosen major cannot be swapped out
        session.confirm_step(Some("Cardiac"), 1.0).unwrap();
        assert!(session.jump_to(0).is_err());
        assert_eq!(session.current_step(), Some(Step::Triage));
        assert_eq!(session.pending().unwrap().sub.as_deref(), Some("Cardiac"));
    }

    #[test]
    fn test_jump_between_items() {
        let mut session = scenario_session();
        session.start("E1", Mode::Plain, 0).unwrap();

        session.jump_to(1).unwrap();
        assert_eq!(session.pointer(), Some(1));
        assert_eq!(session.current_step(), Some(Step::Major));
        assert!(matches!(
            session.jump_to(5),
            Err(SessionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_finalize_once() {
        let mut session = Session::new(
            vec![item(7, "adult"), item(7, "adult"), item(9, "pediatric")],
            Some(scenario_taxonomy()),
        );
        session.start("E1", Mode::Plain, 0).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 2");

        let rows = session.finalize();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.len(), session.progress().0);
    }

    #[test]
    fn test_sub_options_dedupe_repeated_rows() {
        let adult: CategoryTable = [("M", "A"), ("M", "B"), ("M", "A"), ("M", "A")]
            .into_iter()
            .collect();
        let mut session = Session::new(
            vec![item(1, "15세 이상")],
            Some(Taxonomy::new().with(AgeBracket::Adult, adult)),
        );
        session.start("E1", Mode::Plain, 0).unwrap();
        session.confirm_step(Some("M"), 1.0).unwrap();
        assert_eq!(session.current_options(), vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_age_uses_adult_taxonomy() {
        let mut session = Session::new(vec![item(1, "")], Some(scenario_taxonomy()));
        session.start("E1", Mode::Plain, 0).unwrap();
        assert_eq!(session.current_options(), vec!["Chest Pain"]);
    }

    #[test]
    fn test_missing_taxonomy_falls_back_to_item_lists() {
        let fallback = item(1, "adult").with_fallbacks(
            vec!["Abdominal Pain".to_string()],
            vec!["Gastric".to_string()],
        );
        let mut session = Session::new(vec![fallback, item(2, "adult")], None);
        session.start("E1", Mode::Plain, 0).unwrap();

        assert_eq!(session.current_options(), vec!["Abdominal Pain"]);
        session.confirm_step(Some("Abdominal Pain"), 1.0).unwrap();
        assert_eq!(session.current_options(), vec!["Gastric"]);
        session.confirm_step(Some("Gastric"), 1.0).unwrap();
        session.confirm_step(Some("Level 3"), 1.0).unwrap();

        // No fallback list: nothing to choose, but not an error
        assert!(session.current_options().is_empty());
    }

    #[test]
    fn test_cross_bracket_major_falls_back_to_item_subs() {
        let child = item(9, "pediatric").with_fallbacks(vec![], vec!["Other".to_string()]);
        let mut session = Session::new(vec![child], Some(scenario_taxonomy()));
        session.start("E1", Mode::Plain, 0).unwrap();
        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();
        assert_eq!(session.current_options(), vec!["Other"]);
    }

    #[test]
    fn test_finalize_keeps_item_order_without_padding() {
        let items = (1..=5).map(|id| item(id, "adult")).collect();
        let mut session = Session::new(items, Some(scenario_taxonomy()));
        session.start("E1", Mode::Plain, 3).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 2");
        session.jump_to(1).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 3");
        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();

        let rows = session.finalize();
        let ids: Vec<i64> = rows.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_reset_is_total() {
        let mut session = scenario_session();
        session.start("E1", Mode::Assisted, 0).unwrap();
        annotate(&mut session, "Chest Pain", "Cardiac", "Level 2");
        session.confirm_step(Some("Fever"), 1.0).unwrap();

        session.reset();
        assert!(!session.is_started());
        assert_eq!(session.progress(), (0, 2));
        assert!(session.pending().is_none());
        assert!(session.current_options().is_empty());
        assert!(session.finalize().is_empty());
        assert_eq!(session.items().len(), 2);
    }

    #[test]
    fn test_prediction_only_in_assisted_mode() {
        let predicted = item(1, "adult").with_predictions(
            Some("Chest Pain".to_string()),
            Some("Cardiac".to_string()),
            Some("Level 2 - 긴급 (Emergency)".to_string()),
        );
        let mut session = Session::new(vec![predicted], Some(scenario_taxonomy()));

        session.start("E1", Mode::Plain, 0).unwrap();
        assert_eq!(session.current_prediction(), None);

        session.start("E1", Mode::Assisted, 0).unwrap();
        assert_eq!(session.current_prediction(), Some("Chest Pain"));
        session.confirm_step(Some("Chest Pain"), 1.0).unwrap();
        assert_eq!(session.current_prediction(), Some("Cardiac"));
        session.confirm_step(Some("Cardiac"), 1.0).unwrap();
        assert_eq!(
            session.current_prediction(),
            Some("Level 2 - 긴급 (Emergency)")
        );
    }
}
