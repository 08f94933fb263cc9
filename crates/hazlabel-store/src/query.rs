//! Filter and sort pipeline over a task snapshot.
//!
//! [`run_query`] is pure: it reads the snapshot and the parameters and
//! returns the matching tasks, never touching the store.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hazlabel_core::{HazardTask, LabelField, LabelState, Taxonomy, hours_left};

use crate::StoreError;
use crate::sort::{SortDirective, sort_tasks};

/// Band on a task's lowest pending top-candidate relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// Below 50.
    #[serde(rename = "0-50")]
    Low,
    /// 50 up to, not including, 70.
    #[serde(rename = "50-70")]
    Medium,
    /// 70 and above.
    #[serde(rename = "70-100")]
    High,
}

impl ConfidenceBand {
    pub fn contains(&self, relevance: u8) -> bool {
        match self {
            Self::Low => relevance < 50,
            Self::Medium => (50..70).contains(&relevance),
            Self::High => relevance >= 70,
        }
    }
}

impl FromStr for ConfidenceBand {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0-50" => Ok(Self::Low),
            "50-70" => Ok(Self::Medium),
            "70-100" => Ok(Self::High),
            other => Err(StoreError::InvalidQuery(format!("unknown confidence band '{other}'"))),
        }
    }
}

/// Band on whole hours left before the SLA deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLeftBand {
    #[serde(rename = "<6h")]
    UnderSixHours,
    #[serde(rename = "<24h")]
    UnderADay,
    /// 24 hours or more.
    #[serde(rename = ">24h")]
    OverADay,
}

impl TimeLeftBand {
    pub fn contains(&self, hours: i64) -> bool {
        match self {
            Self::UnderSixHours => hours < 6,
            Self::UnderADay => hours < 24,
            Self::OverADay => hours >= 24,
        }
    }
}

impl FromStr for TimeLeftBand {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<6h" => Ok(Self::UnderSixHours),
            "<24h" => Ok(Self::UnderADay),
            ">24h" => Ok(Self::OverADay),
            other => Err(StoreError::InvalidQuery(format!("unknown time-left band '{other}'"))),
        }
    }
}

/// Inclusion sets per attribute. An empty set keeps everything; all
/// non-empty sets must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFilters {
    pub site: BTreeSet<String>,
    pub location: BTreeSet<String>,
    pub detail_location: BTreeSet<String>,
    pub nonconformity: BTreeSet<String>,
    pub sub_nonconformity: BTreeSet<String>,
    pub pic_company: BTreeSet<String>,
    /// Display label per taxonomy (decided label, else AI label).
    pub labels: BTreeMap<Taxonomy, BTreeSet<String>>,
    pub confidence: Option<ConfidenceBand>,
    pub time_left: Option<TimeLeftBand>,
}

impl FieldFilters {
    /// Number of active selections, for the filter bar badge.
    pub fn active_count(&self) -> usize {
        let sets = [
            &self.site,
            &self.location,
            &self.detail_location,
            &self.nonconformity,
            &self.sub_nonconformity,
            &self.pic_company,
        ];
        sets.iter().map(|s| s.len()).sum::<usize>()
            + self.labels.values().map(BTreeSet::len).sum::<usize>()
            + usize::from(self.confidence.is_some())
            + usize::from(self.time_left.is_some())
    }

    fn matches(&self, task: &HazardTask, now: DateTime<Utc>) -> bool {
        let attrs = [
            (&self.site, &task.site),
            (&self.location, &task.location),
            (&self.detail_location, &task.detail_location),
            (&self.nonconformity, &task.nonconformity),
            (&self.sub_nonconformity, &task.sub_nonconformity),
            (&self.pic_company, &task.pic_company),
        ];
        if !attrs.iter().all(|(set, value)| admits(set, value)) {
            return false;
        }
        let labels_ok = self.labels.iter().all(|(taxonomy, set)| {
            admits(set, task.field(*taxonomy).display_label().unwrap_or_default())
        });
        if !labels_ok {
            return false;
        }
        if let Some(band) = self.confidence
            && !band.contains(task.min_pending_relevance())
        {
            return false;
        }
        if let Some(band) = self.time_left
            && !band.contains(hours_left(task.sla_deadline(), now))
        {
            return false;
        }
        true
    }
}

fn admits(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

/// Per-taxonomy filter on field lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFilter {
    #[default]
    All,
    AutoConfirmed,
    HumanAnnotated,
    Waiting,
}

impl LabelFilter {
    pub fn matches(&self, field: &LabelField) -> bool {
        match self {
            Self::All => true,
            Self::AutoConfirmed => field.state() == LabelState::AutoConfirmed,
            Self::HumanAnnotated => field.state() == LabelState::HumanDecided,
            Self::Waiting => field.state() == LabelState::Waiting,
        }
    }
}

impl FromStr for LabelFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "auto_confirmed" => Ok(Self::AutoConfirmed),
            "human_annotated" => Ok(Self::HumanAnnotated),
            "waiting" => Ok(Self::Waiting),
            other => Err(StoreError::InvalidQuery(format!("unknown label filter '{other}'"))),
        }
    }
}

/// Label filters for all three taxonomies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelFilters {
    pub tbc: LabelFilter,
    pub pspp: LabelFilter,
    pub gr: LabelFilter,
}

impl LabelFilters {
    pub fn get(&self, taxonomy: Taxonomy) -> LabelFilter {
        match taxonomy {
            Taxonomy::Tbc => self.tbc,
            Taxonomy::Pspp => self.pspp,
            Taxonomy::Gr => self.gr,
        }
    }

    pub fn set(&mut self, taxonomy: Taxonomy, filter: LabelFilter) {
        match taxonomy {
            Taxonomy::Tbc => self.tbc = filter,
            Taxonomy::Pspp => self.pspp = filter,
            Taxonomy::Gr => self.gr = filter,
        }
    }

    fn matches(&self, task: &HazardTask) -> bool {
        Taxonomy::ALL
            .iter()
            .all(|t| self.get(*t).matches(task.field(*t)))
    }
}

/// Everything that shapes the table view except the page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Case-insensitive substring of the task id. Blank means no filter.
    pub search: String,
    pub field_filters: FieldFilters,
    pub label_filters: LabelFilters,
    pub sort: SortDirective,
}

/// Filter then sort `tasks`. Unsorted results keep store order.
pub fn run_query(
    tasks: &[Arc<HazardTask>],
    params: &QueryParams,
    now: DateTime<Utc>,
) -> Vec<Arc<HazardTask>> {
    let needle = params.search.trim().to_lowercase();
    let mut out: Vec<Arc<HazardTask>> = tasks
        .iter()
        .filter(|t| needle.is_empty() || t.id.to_lowercase().contains(&needle))
        .filter(|t| params.field_filters.matches(t, now))
        .filter(|t| params.label_filters.matches(t))
        .cloned()
        .collect();
    sort_tasks(&mut out, params.sort, now);
    out
}
