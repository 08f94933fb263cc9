//! Hazard tasks and task status derivation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{AICandidate, AnnotationError, LabelField, Taxonomy};

/// Default SLA window from ingestion to auto-confirmation.
pub const DEFAULT_SLA_HOURS: i64 = 48;

/// Longest SLA window a deployment may configure: one year.
pub const MAX_SLA_HOURS: i64 = 24 * 365;

/// Task-level evaluation status. Only [`derive_status`] decides it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    AiPending,
    InProgress,
    HumanLocked,
    AutoConfirmed,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiPending => "ai_pending",
            Self::InProgress => "in_progress",
            Self::HumanLocked => "human_locked",
            Self::AutoConfirmed => "auto_confirmed",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming hazard report with its AI candidates, before ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardReport {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "pic_perusahaan")]
    pub pic_company: String,
    pub site: String,
    #[serde(alias = "lokasi")]
    pub location: String,
    pub detail_location: String,
    #[serde(alias = "ketidaksesuaian")]
    pub nonconformity: String,
    #[serde(alias = "sub_ketidaksesuaian")]
    pub sub_nonconformity: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub tbc: Vec<AICandidate>,
    #[serde(default)]
    pub pspp: Vec<AICandidate>,
    #[serde(default)]
    pub gr: Vec<AICandidate>,
}

/// A hazard report under evaluation, owning one label field per taxonomy.
///
/// Descriptive attributes are public. Label fields, status and the
/// submission record change only through the methods below so the status
/// always matches the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTask {
    pub id: String,
    /// When the hazard was reported.
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "pic_perusahaan")]
    pub pic_company: String,
    pub site: String,
    #[serde(alias = "lokasi")]
    pub location: String,
    pub detail_location: String,
    #[serde(alias = "ketidaksesuaian")]
    pub nonconformity: String,
    #[serde(alias = "sub_ketidaksesuaian")]
    pub sub_nonconformity: String,
    pub description: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    tbc: LabelField,
    pspp: LabelField,
    gr: LabelField,
    sla_deadline: DateTime<Utc>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submitted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_justification: Option<String>,
}

impl HazardTask {
    /// Create a task from a report, all fields unlocked, due `sla_hours` after `now`.
    pub fn ingest(
        report: HazardReport,
        sla_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, AnnotationError> {
        for candidate in report.tbc.iter().chain(&report.pspp).chain(&report.gr) {
            candidate.validate()?;
        }
        let sla_deadline = Duration::try_hours(sla_hours)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| {
                AnnotationError::InvalidSelection(format!("sla_hours {sla_hours} out of range"))
            })?;
        Ok(Self {
            id: report.id,
            timestamp: report.timestamp,
            pic_company: report.pic_company,
            site: report.site,
            location: report.location,
            detail_location: report.detail_location,
            nonconformity: report.nonconformity,
            sub_nonconformity: report.sub_nonconformity,
            description: report.description,
            image_url: report.image_url,
            reporter: report.reporter,
            tbc: LabelField::new(report.tbc),
            pspp: LabelField::new(report.pspp),
            gr: LabelField::new(report.gr),
            sla_deadline,
            status: TaskStatus::AiPending,
            submitted_at: None,
            submitted_by: None,
            final_justification: None,
        })
    }

    pub fn field(&self, taxonomy: Taxonomy) -> &LabelField {
        match taxonomy {
            Taxonomy::Tbc => &self.tbc,
            Taxonomy::Pspp => &self.pspp,
            Taxonomy::Gr => &self.gr,
        }
    }

    /// Mutable access for the annotation engine. Call
    /// [`refresh_status`](Self::refresh_status) after any transition.
    pub fn field_mut(&mut self, taxonomy: Taxonomy) -> &mut LabelField {
        match taxonomy {
            Taxonomy::Tbc => &mut self.tbc,
            Taxonomy::Pspp => &mut self.pspp,
            Taxonomy::Gr => &mut self.gr,
        }
    }

    /// All three fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (Taxonomy, &LabelField)> {
        Taxonomy::ALL.into_iter().map(move |t| (t, self.field(t)))
    }

    pub fn sla_deadline(&self) -> DateTime<Utc> {
        self.sla_deadline
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn submitted_by(&self) -> Option<&str> {
        self.submitted_by.as_deref()
    }

    pub fn final_justification(&self) -> Option<&str> {
        self.final_justification.as_deref()
    }

    /// Lowest top-candidate relevance among undecided fields, 100 if none.
    pub fn min_pending_relevance(&self) -> u8 {
        self.fields()
            .filter(|(_, f)| !f.is_locked() && !f.candidates().is_empty())
            .map(|(_, f)| f.top_relevance())
            .min()
            .unwrap_or(100)
    }

    pub fn refresh_status(&mut self, editing: bool) {
        self.status = derive_status(self, editing);
    }

    /// Mark the task completed. Final; a second submission is rejected.
    pub fn submit(
        &mut self,
        evaluator: &str,
        justification: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AnnotationError> {
        if self.is_completed() {
            return Err(AnnotationError::TaskCompleted);
        }
        if evaluator.trim().is_empty() {
            return Err(AnnotationError::InvalidSelection(
                "evaluator identity is empty".into(),
            ));
        }
        self.submitted_at = Some(now);
        self.submitted_by = Some(evaluator.trim().to_string());
        self.final_justification = justification
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .map(str::to_string);
        self.status = TaskStatus::Completed;
        Ok(())
    }

    /// Check an imported task: field invariants and status agreement.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        for (_, field) in self.fields() {
            field.validate()?;
        }
        if self.status == TaskStatus::Completed && !self.is_completed() {
            return Err(AnnotationError::InvalidSelection(format!(
                "task {} is completed without a submission record",
                self.id
            )));
        }
        Ok(())
    }
}

/// Compute a task's status from its fields and submission record.
///
/// Submitted tasks are `Completed`. Otherwise the most recent decision
/// decides between `HumanLocked` and `AutoConfirmed`, ties going to
/// `AutoConfirmed`. Undecided tasks are `InProgress` while one of their
/// fields is being edited, else `AiPending`.
pub fn derive_status(task: &HazardTask, editing: bool) -> TaskStatus {
    if task.is_completed() {
        return TaskStatus::Completed;
    }
    let latest = task
        .fields()
        .map(|(_, f)| f)
        .filter(|f| f.is_locked())
        .max_by_key(|f| (f.annotated_at(), f.is_auto_confirmed()));
    match latest {
        Some(f) if f.is_auto_confirmed() => TaskStatus::AutoConfirmed,
        Some(_) => TaskStatus::HumanLocked,
        None if editing => TaskStatus::InProgress,
        None => TaskStatus::AiPending,
    }
}
