//! Override selection: what the evaluator has picked in an open editor.
//!
//! The draft only records intent. [`OverrideDraft::resolve`] turns it into a
//! `(label, note)` pair for [`decide`](crate::decide); it never touches a
//! label field.

use hazlabel_core::{AICandidate, AnnotationError};

/// Candidate ranks offered as overrides. Rank 0 is the AI's own pick.
pub const SELECTABLE_RANKS: std::ops::RangeInclusive<usize> = 1..=2;

/// The evaluator's current pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// Index into the field's candidate list.
    Candidate(usize),
    /// A label from the taxonomy option set.
    Other(String),
}

/// An override being composed for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideDraft {
    selection: Selection,
    note: String,
}

impl OverrideDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Pick the candidate at `rank`. Picking the selected rank again clears it.
    pub fn select_candidate(&mut self, rank: usize) -> Result<(), AnnotationError> {
        if !SELECTABLE_RANKS.contains(&rank) {
            return Err(AnnotationError::InvalidSelection(format!(
                "candidate rank {rank} cannot be chosen as an override"
            )));
        }
        self.selection = if self.selection == Selection::Candidate(rank) {
            Selection::None
        } else {
            Selection::Candidate(rank)
        };
        Ok(())
    }

    /// Pick a label from `options`, replacing any candidate pick.
    pub fn select_other(&mut self, label: &str, options: &[&str]) -> Result<(), AnnotationError> {
        if !options.contains(&label) {
            return Err(AnnotationError::InvalidSelection(format!(
                "'{label}' is not a valid option"
            )));
        }
        self.selection = Selection::Other(label.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
    }

    /// The `(label, note)` to commit, checked against the field's candidates.
    pub fn resolve(
        &self,
        candidates: &[AICandidate],
        options: &[&str],
    ) -> Result<(String, String), AnnotationError> {
        let label = match &self.selection {
            Selection::None => {
                return Err(AnnotationError::InvalidSelection(
                    "nothing selected".into(),
                ));
            }
            Selection::Candidate(rank) => candidates
                .get(*rank)
                .filter(|_| SELECTABLE_RANKS.contains(rank))
                .map(|c| c.label.clone())
                .ok_or_else(|| {
                    AnnotationError::InvalidSelection(format!(
                        "candidate rank {rank} no longer exists"
                    ))
                })?,
            Selection::Other(label) if options.contains(&label.as_str()) => label.clone(),
            Selection::Other(label) => {
                return Err(AnnotationError::InvalidSelection(format!(
                    "'{label}' is not a valid option"
                )));
            }
        };

        let note = self.note.trim();
        if note.is_empty() {
            return Err(AnnotationError::InvalidSelection(
                "annotation note is required".into(),
            ));
        }
        Ok((label, note.to_string()))
    }
}
