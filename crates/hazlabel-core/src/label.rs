//! AI candidates and the per-taxonomy label field state machine.
//!
//! A [`LabelField`] starts `Waiting` and moves exactly once, either to
//! `HumanDecided` through [`LabelField::apply_human_decision`] or to
//! `AutoConfirmed` through [`LabelField::apply_auto_confirm`]. Both are
//! terminal. Every check runs before any write, so a rejected transition
//! leaves the field untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnnotationError;

/// Note recorded on fields decided by the SLA-timeout path.
pub const AUTO_CONFIRM_NOTE: &str = "Auto-confirmed by AI (SLA expired)";

/// Maximum candidate relevance.
pub const MAX_RELEVANCE: u8 = 100;

/// One AI classification proposal. Produced upstream and never re-ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AICandidate {
    pub label: String,
    /// 0–100.
    pub relevance: u8,
    pub reasoning: String,
}

impl AICandidate {
    pub fn new(
        label: impl Into<String>,
        relevance: i64,
        reasoning: impl Into<String>,
    ) -> Result<Self, AnnotationError> {
        if !(0..=i64::from(MAX_RELEVANCE)).contains(&relevance) {
            return Err(AnnotationError::RelevanceOutOfRange(relevance));
        }
        Ok(Self {
            label: label.into(),
            relevance: relevance as u8,
            reasoning: reasoning.into(),
        })
    }

    pub fn validate(&self) -> Result<(), AnnotationError> {
        if self.relevance > MAX_RELEVANCE {
            return Err(AnnotationError::RelevanceOutOfRange(i64::from(
                self.relevance,
            )));
        }
        Ok(())
    }
}

/// Where a label field sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelState {
    Waiting,
    HumanDecided,
    AutoConfirmed,
}

impl LabelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::HumanDecided => "human_annotated",
            Self::AutoConfirmed => "auto_confirmed",
        }
    }
}

/// Annotation state for one taxonomy on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelField {
    #[serde(default)]
    ai_label: Option<String>,
    #[serde(default)]
    human_label: Option<String>,
    #[serde(default)]
    candidates: Vec<AICandidate>,
    #[serde(default)]
    annotation_note: Option<String>,
    #[serde(default)]
    annotated_by: Option<String>,
    #[serde(default)]
    annotated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    auto_confirmed: bool,
}

impl LabelField {
    /// An undecided field. `candidates` must already be ordered, best first.
    pub fn new(candidates: Vec<AICandidate>) -> Self {
        Self {
            ai_label: candidates.first().map(|c| c.label.clone()),
            human_label: None,
            candidates,
            annotation_note: None,
            annotated_by: None,
            annotated_at: None,
            locked: false,
            auto_confirmed: false,
        }
    }

    pub fn ai_label(&self) -> Option<&str> {
        self.ai_label.as_deref()
    }

    pub fn human_label(&self) -> Option<&str> {
        self.human_label.as_deref()
    }

    pub fn candidates(&self) -> &[AICandidate] {
        &self.candidates
    }

    pub fn annotation_note(&self) -> Option<&str> {
        self.annotation_note.as_deref()
    }

    /// Evaluator who decided the field. `None` for auto-confirmed fields.
    pub fn annotated_by(&self) -> Option<&str> {
        self.annotated_by.as_deref()
    }

    pub fn annotated_at(&self) -> Option<DateTime<Utc>> {
        self.annotated_at
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_auto_confirmed(&self) -> bool {
        self.auto_confirmed
    }

    pub fn top_candidate(&self) -> Option<&AICandidate> {
        self.candidates.first()
    }

    /// Relevance of the top candidate, 0 when there are none.
    pub fn top_relevance(&self) -> u8 {
        self.top_candidate().map_or(0, |c| c.relevance)
    }

    /// Label shown in the table: the decided label, else the AI's top pick.
    pub fn display_label(&self) -> Option<&str> {
        self.human_label().or(self.ai_label())
    }

    pub fn state(&self) -> LabelState {
        if self.auto_confirmed {
            LabelState::AutoConfirmed
        } else if self.locked {
            LabelState::HumanDecided
        } else {
            LabelState::Waiting
        }
    }

    /// Record an evaluator's decision and lock the field.
    pub fn apply_human_decision(
        &mut self,
        label: &str,
        note: &str,
        evaluator: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AnnotationError> {
        if self.locked {
            return Err(AnnotationError::AlreadyLocked);
        }
        if label.trim().is_empty() {
            return Err(AnnotationError::InvalidSelection("label is empty".into()));
        }
        if note.trim().is_empty() {
            return Err(AnnotationError::InvalidSelection(
                "annotation note is required".into(),
            ));
        }
        if evaluator.trim().is_empty() {
            return Err(AnnotationError::InvalidSelection(
                "evaluator identity is empty".into(),
            ));
        }

        self.human_label = Some(label.to_string());
        self.annotation_note = Some(note.trim().to_string());
        self.annotated_by = Some(evaluator.trim().to_string());
        self.annotated_at = Some(now);
        self.locked = true;
        self.auto_confirmed = false;
        Ok(())
    }

    /// Lock the field with its top candidate once `deadline` has passed.
    pub fn apply_auto_confirm(
        &mut self,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AnnotationError> {
        if self.locked {
            return Err(AnnotationError::AlreadyLocked);
        }
        if now < deadline {
            return Err(AnnotationError::DeadlineNotReached);
        }
        let top = self
            .candidates
            .first()
            .map(|c| c.label.clone())
            .ok_or(AnnotationError::NoCandidates)?;

        self.human_label = Some(top);
        self.annotation_note = Some(AUTO_CONFIRM_NOTE.to_string());
        self.annotated_by = None;
        self.annotated_at = Some(now);
        self.locked = true;
        self.auto_confirmed = true;
        Ok(())
    }

    /// Check candidate ranges and lock consistency, e.g. after a JSON import.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        for candidate in &self.candidates {
            candidate.validate()?;
        }
        if self.ai_label() != self.top_candidate().map(|c| c.label.as_str()) {
            return Err(AnnotationError::InvalidSelection(
                "ai_label disagrees with the top candidate".into(),
            ));
        }
        let decided = self.human_label.is_some() || self.auto_confirmed;
        if self.locked != decided {
            return Err(AnnotationError::InvalidSelection(
                "locked flag disagrees with decision".into(),
            ));
        }
        if self.auto_confirmed && self.annotated_by.is_some() {
            return Err(AnnotationError::InvalidSelection(
                "auto-confirmed field carries an evaluator".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    fn candidate(label: &str, relevance: i64) -> AICandidate {
        AICandidate::new(label, relevance, "reason").unwrap()
    }

    fn sample_field() -> LabelField {
        LabelField::new(vec![
            candidate("7. LOTO", 82),
            candidate("6. Pengamanan", 64),
            candidate("2. Housekeeping", 31),
        ])
    }

    #[test]
    fn new_field_takes_ai_label_from_top_candidate() {
        let field = sample_field();
        assert_eq!(field.ai_label(), Some("7. LOTO"));
        assert_eq!(field.state(), LabelState::Waiting);
        assert_eq!(field.top_relevance(), 82);
        assert_eq!(field.display_label(), Some("7. LOTO"));

        let empty = LabelField::new(vec![]);
        assert_eq!(empty.ai_label(), None);
        assert_eq!(empty.top_relevance(), 0);
    }

    #[test]
    fn rejects_relevance_out_of_range() {
        assert_eq!(
            AICandidate::new("x", 101, "").unwrap_err(),
            AnnotationError::RelevanceOutOfRange(101)
        );
        assert!(AICandidate::new("x", -1, "").is_err());
        assert!(AICandidate::new("x", 0, "").is_ok());
    }

    #[test]
    fn human_decision_locks_field() {
        let mut field = sample_field();
        field
            .apply_human_decision("6. Pengamanan", "  barrier missing ", "Rina", t0())
            .unwrap();

        assert_eq!(field.state(), LabelState::HumanDecided);
        assert_eq!(field.human_label(), Some("6. Pengamanan"));
        assert_eq!(field.annotation_note(), Some("barrier missing"));
        assert_eq!(field.annotated_by(), Some("Rina"));
        assert_eq!(field.annotated_at(), Some(t0()));
        assert!(field.is_locked());
        assert!(!field.is_auto_confirmed());
        assert_eq!(field.display_label(), Some("6. Pengamanan"));
        field.validate().unwrap();
    }

    #[test]
    fn human_decision_requires_label_note_and_evaluator() {
        let mut field = sample_field();
        let before = field.clone();
        for (label, note, who) in [("", "n", "Rina"), ("L", "   ", "Rina"), ("L", "n", " ")] {
            let err = field.apply_human_decision(label, note, who, t0()).unwrap_err();
            assert!(matches!(err, AnnotationError::InvalidSelection(_)));
        }
        assert_eq!(field, before);
    }

    #[test]
    fn locked_field_rejects_every_mutation_unchanged() {
        let mut field = sample_field();
        field.apply_human_decision("2. Housekeeping", "ok", "Rina", t0()).unwrap();
        let before = field.clone();

        let later = t0() + Duration::hours(100);
        assert_eq!(
            field.apply_human_decision("7. LOTO", "again", "Budi", later),
            Err(AnnotationError::AlreadyLocked)
        );
        assert_eq!(
            field.apply_auto_confirm(t0(), later),
            Err(AnnotationError::AlreadyLocked)
        );
        assert_eq!(field, before);
    }

    #[test]
    fn auto_confirm_waits_for_deadline() {
        let mut field = sample_field();
        let deadline = t0() + Duration::minutes(3);
        assert_eq!(
            field.apply_auto_confirm(deadline, t0()),
            Err(AnnotationError::DeadlineNotReached)
        );
        assert_eq!(field.state(), LabelState::Waiting);
    }

    #[test]
    fn auto_confirm_takes_top_candidate() {
        let mut field = sample_field();
        let deadline = t0();
        field.apply_auto_confirm(deadline, deadline).unwrap();

        assert_eq!(field.state(), LabelState::AutoConfirmed);
        assert_eq!(field.human_label(), Some("7. LOTO"));
        assert_eq!(field.annotation_note(), Some(AUTO_CONFIRM_NOTE));
        assert_eq!(field.annotated_by(), None);
        assert_eq!(field.annotated_at(), Some(deadline));
        field.validate().unwrap();
    }

    #[test]
    fn auto_confirm_without_candidates_stays_waiting() {
        let mut field = LabelField::new(vec![]);
        assert_eq!(
            field.apply_auto_confirm(t0(), t0()),
            Err(AnnotationError::NoCandidates)
        );
        assert_eq!(field.state(), LabelState::Waiting);
        assert!(!field.is_locked());
    }

    #[test]
    fn validate_catches_inconsistent_import() {
        let json = r#"{"human_label":"7. LOTO","locked":false}"#;
        let field: LabelField = serde_json::from_str(json).unwrap();
        assert!(field.validate().is_err());

        let json = r#"{"candidates":[{"label":"a","relevance":140,"reasoning":""}]}"#;
        let field: LabelField = serde_json::from_str(json).unwrap();
        assert_eq!(
            field.validate(),
            Err(AnnotationError::RelevanceOutOfRange(140))
        );
    }

    #[test]
    fn validate_ties_ai_label_to_top_candidate() {
        let json = r#"{"ai_label":"6. Pengamanan","candidates":[{"label":"7. LOTO","relevance":80,"reasoning":""}]}"#;
        let field: LabelField = serde_json::from_str(json).unwrap();
        assert!(matches!(
            field.validate(),
            Err(AnnotationError::InvalidSelection(_))
        ));

        let json = r#"{"ai_label":"7. LOTO","candidates":[]}"#;
        let field: LabelField = serde_json::from_str(json).unwrap();
        assert!(field.validate().is_err());

        let json = r#"{"ai_label":"7. LOTO","candidates":[{"label":"7. LOTO","relevance":80,"reasoning":""}]}"#;
        let field: LabelField = serde_json::from_str(json).unwrap();
        field.validate().unwrap();
        sample_field().validate().unwrap();
    }
}
