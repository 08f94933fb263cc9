//! SLA sweep over a task snapshot.
//!
//! Pure: takes the current tasks and an instant, returns the next tasks and
//! what happened. Unchanged tasks keep their `Arc`, so the new snapshot
//! shares everything the sweep did not touch. Running it twice at the same
//! instant confirms nothing the second time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use hazlabel_core::{HazardTask, Taxonomy};

use crate::annotate::expire;

/// A `(task id, taxonomy)` pair named in a sweep report.
pub type FieldRef = (String, Taxonomy);

/// Result of one sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// All tasks, in input order.
    pub tasks: Vec<Arc<HazardTask>>,
    pub confirmed: Vec<FieldRef>,
    /// Expired fields left waiting because they have no candidates.
    pub skipped: Vec<FieldRef>,
    /// Ids of tasks replaced by this sweep.
    pub changed: Vec<String>,
}

impl SweepReport {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Auto-confirm every expired, unlocked field of every non-completed task.
pub fn sweep(tasks: &[Arc<HazardTask>], now: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport {
        tasks: Vec::with_capacity(tasks.len()),
        ..Default::default()
    };

    for task in tasks {
        let expiry = expire(task, now);
        report
            .confirmed
            .extend(expiry.confirmed.iter().map(|t| (task.id.clone(), *t)));
        report
            .skipped
            .extend(expiry.skipped.iter().map(|t| (task.id.clone(), *t)));
        match expiry.task {
            Some(next) => {
                report.changed.push(task.id.clone());
                report.tasks.push(Arc::new(next));
            }
            None => report.tasks.push(Arc::clone(task)),
        }
    }

    if !report.is_noop() {
        info!(
            tasks = report.changed.len(),
            fields = report.confirmed.len(),
            skipped = report.skipped.len(),
            "sweep auto-confirmed expired fields"
        );
    }
    report
}
