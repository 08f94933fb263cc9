//! Values offered by the filter bar, and per-row warning flags.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use hazlabel_core::{HazardTask, TaskStatus, Taxonomy, hours_left};

/// Relevance below which a pending task is flagged.
pub const LOW_RELEVANCE_THRESHOLD: u8 = 70;

/// Hours left below which a pending task is flagged urgent.
pub const URGENT_HOURS: i64 = 6;

/// Distinct, sorted, non-empty values per filterable attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub sites: Vec<String>,
    pub locations: Vec<String>,
    pub detail_locations: Vec<String>,
    pub nonconformities: Vec<String>,
    pub sub_nonconformities: Vec<String>,
    pub pic_companies: Vec<String>,
    pub labels: BTreeMap<Taxonomy, Vec<String>>,
}

impl FilterOptions {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a HazardTask> + Clone) -> Self {
        Self {
            sites: unique(tasks.clone().into_iter().map(|t| t.site.as_str())),
            locations: unique(tasks.clone().into_iter().map(|t| t.location.as_str())),
            detail_locations: unique(tasks.clone().into_iter().map(|t| t.detail_location.as_str())),
            nonconformities: unique(tasks.clone().into_iter().map(|t| t.nonconformity.as_str())),
            sub_nonconformities: unique(
                tasks.clone().into_iter().map(|t| t.sub_nonconformity.as_str()),
            ),
            pic_companies: unique(tasks.clone().into_iter().map(|t| t.pic_company.as_str())),
            labels: Taxonomy::ALL
                .into_iter()
                .map(|taxonomy| {
                    let values = tasks
                        .clone()
                        .into_iter()
                        .filter_map(|t| t.field(taxonomy).display_label());
                    (taxonomy, unique(values))
                })
                .collect(),
        }
    }
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Warning flags shown on a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowFlags {
    pub min_relevance: u8,
    pub hours_left: i64,
    /// Some pending field's top candidate is below the threshold.
    pub low_relevance: bool,
    pub urgent: bool,
}

impl RowFlags {
    pub fn of(task: &HazardTask, now: DateTime<Utc>) -> Self {
        let min_relevance = task.min_pending_relevance();
        let hours_left = hours_left(task.sla_deadline(), now);
        let open = !matches!(
            task.status(),
            TaskStatus::Completed | TaskStatus::AutoConfirmed
        );
        Self {
            min_relevance,
            hours_left,
            low_relevance: open && min_relevance < LOW_RELEVANCE_THRESHOLD,
            urgent: open && hours_left < URGENT_HOURS,
        }
    }
}
