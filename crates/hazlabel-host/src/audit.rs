//! Audit trail of accepted decisions and submissions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One audited event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub event_type: String,
    pub resource: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

pub const LABEL_DECIDED: &str = "label-decided";
pub const LABEL_AUTO_CONFIRMED: &str = "label-auto-confirmed";
pub const TASK_SUBMITTED: &str = "task-submitted";

/// Append-only list of audit records.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditRecord>,
}

impl AuditLog {
    pub fn record(
        &mut self,
        event_type: &str,
        resource: impl Into<String>,
        detail: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        let record = AuditRecord {
            event_type: event_type.to_string(),
            resource: resource.into(),
            detail: detail.into(),
            timestamp,
        };
        tracing::info!(
            event_type = %record.event_type,
            resource = %record.resource,
            "audit event recorded"
        );
        self.entries.push(record);
    }

    pub fn entries(&self) -> &[AuditRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
