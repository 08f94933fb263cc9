//! Task-level annotation engine.
//!
//! Decisions are applied to a copy of the task; the caller swaps the copy
//! into the store only when the transition succeeded. Status is re-derived
//! on every returned copy.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use hazlabel_core::{AnnotationError, HazardTask, LabelField, Taxonomy};

/// An evaluator's pick for one field.
#[derive(Debug, Clone, Copy)]
pub struct HumanDecision<'a> {
    pub label: &'a str,
    pub note: &'a str,
    pub evaluator: &'a str,
}

/// Apply a human decision to one field of `task`.
///
/// Returns the updated task. On rejection `task` is untouched.
pub fn decide(
    task: &HazardTask,
    taxonomy: Taxonomy,
    decision: HumanDecision<'_>,
    now: DateTime<Utc>,
) -> Result<HazardTask, AnnotationError> {
    let mut next = task.clone();
    next.field_mut(taxonomy).apply_human_decision(
        decision.label,
        decision.note,
        decision.evaluator,
        now,
    )?;
    next.refresh_status(false);
    info!(
        task = %task.id,
        taxonomy = taxonomy.as_str(),
        label = decision.label,
        evaluator = decision.evaluator,
        "human decision applied"
    );
    Ok(next)
}

/// Outcome of auto-confirming the expired fields of one task.
#[derive(Debug, Clone)]
pub struct Expiry {
    /// Updated task, `None` when nothing changed.
    pub task: Option<HazardTask>,
    pub confirmed: Vec<Taxonomy>,
    /// Unlocked fields left waiting because they have no candidates.
    pub skipped: Vec<Taxonomy>,
}

impl Expiry {
    fn unchanged() -> Self {
        Self {
            task: None,
            confirmed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Auto-confirm every unlocked field of `task` whose deadline has passed.
///
/// Completed tasks and tasks still inside their SLA window are left alone.
pub fn expire(task: &HazardTask, now: DateTime<Utc>) -> Expiry {
    if task.is_completed() || now < task.sla_deadline() {
        return Expiry::unchanged();
    }

    let mut next = task.clone();
    let mut expiry = Expiry::unchanged();
    for taxonomy in Taxonomy::ALL {
        let field = next.field_mut(taxonomy);
        if field.is_locked() {
            continue;
        }
        match field.apply_auto_confirm(task.sla_deadline(), now) {
            Ok(()) => expiry.confirmed.push(taxonomy),
            Err(AnnotationError::NoCandidates) => {
                warn!(
                    task = %task.id,
                    taxonomy = taxonomy.as_str(),
                    "no candidates, auto-confirm skipped"
                );
                expiry.skipped.push(taxonomy);
            }
            Err(e) => debug!(
                task = %task.id,
                taxonomy = taxonomy.as_str(),
                error = %e,
                "auto-confirm rejected"
            ),
        }
    }

    if !expiry.confirmed.is_empty() {
        next.refresh_status(false);
        expiry.task = Some(next);
    }
    expiry
}

// ── Agreement ──

/// How a field's decision relates to the AI's top candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    /// Not decided yet; the AI label is only a prediction.
    Predicted,
    /// Decided with the AI's top label, by a human or by auto-confirm.
    Accepted,
    /// A human chose a different label.
    Overridden,
}

impl Agreement {
    pub fn of(field: &LabelField) -> Self {
        match field.human_label() {
            None => Self::Predicted,
            Some(label) if Some(label) == field.ai_label() => Self::Accepted,
            Some(_) => Self::Overridden,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Predicted => "predicted",
            Self::Accepted => "accepted",
            Self::Overridden => "overridden",
        }
    }
}
