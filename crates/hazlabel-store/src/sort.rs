//! Sort directives for the task table.
//!
//! Column sorts and per-taxonomy label sorts share one [`SortDirective`]
//! value, so at most one of them is ever active.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hazlabel_core::{HazardTask, Taxonomy, hours_left};

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Timestamp,
    Site,
    Location,
    /// Top-candidate relevance of one taxonomy.
    Relevance(Taxonomy),
    /// Whole hours until the SLA deadline.
    TimeLeft,
}

impl ColumnKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Site => "site",
            Self::Location => "location",
            Self::Relevance(Taxonomy::Tbc) => "tbc_rel",
            Self::Relevance(Taxonomy::Pspp) => "pspp_rel",
            Self::Relevance(Taxonomy::Gr) => "gr_rel",
            Self::TimeLeft => "time_left",
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timestamp" => Ok(Self::Timestamp),
            "site" => Ok(Self::Site),
            "location" | "lokasi" => Ok(Self::Location),
            "tbc_rel" => Ok(Self::Relevance(Taxonomy::Tbc)),
            "pspp_rel" => Ok(Self::Relevance(Taxonomy::Pspp)),
            "gr_rel" => Ok(Self::Relevance(Taxonomy::Gr)),
            "time_left" => Ok(Self::TimeLeft),
            other => Err(StoreError::InvalidQuery(format!("unknown sort column '{other}'"))),
        }
    }
}

/// Orders offered by a taxonomy column's label menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    RelevanceDesc,
    RelevanceAsc,
    /// Closest deadline first.
    SlaAsc,
    SlaDesc,
    /// Most recently reported first.
    Newest,
    Oldest,
}

impl LabelOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelevanceDesc => "relevance_desc",
            Self::RelevanceAsc => "relevance_asc",
            Self::SlaAsc => "sla_asc",
            Self::SlaDesc => "sla_desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl FromStr for LabelOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance_desc" => Ok(Self::RelevanceDesc),
            "relevance_asc" => Ok(Self::RelevanceAsc),
            "sla_asc" => Ok(Self::SlaAsc),
            "sla_desc" => Ok(Self::SlaDesc),
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            other => Err(StoreError::InvalidQuery(format!("unknown label order '{other}'"))),
        }
    }
}

/// The single active sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirective {
    /// Store order.
    #[default]
    None,
    Column(ColumnKey, SortDir),
    Label(Taxonomy, LabelOrder),
}

impl SortDirective {
    /// Next directive after clicking a column header: asc, desc, off.
    /// A different column (or an active label sort) starts at asc.
    pub fn toggle_column(self, key: ColumnKey) -> Self {
        match self {
            Self::Column(k, SortDir::Asc) if k == key => Self::Column(key, SortDir::Desc),
            Self::Column(k, SortDir::Desc) if k == key => Self::None,
            _ => Self::Column(key, SortDir::Asc),
        }
    }

    /// Set or clear the label sort of `taxonomy`. Setting replaces any other
    /// sort; clearing only affects a label sort on that same taxonomy.
    pub fn with_label_sort(self, taxonomy: Taxonomy, order: Option<LabelOrder>) -> Self {
        match order {
            Some(order) => Self::Label(taxonomy, order),
            None => match self {
                Self::Label(t, _) if t == taxonomy => Self::None,
                other => other,
            },
        }
    }
}

// ── Ordering ──

/// Sort `tasks` in place. `SortDirective::None` keeps the input order.
pub fn sort_tasks(tasks: &mut [Arc<HazardTask>], directive: SortDirective, now: DateTime<Utc>) {
    if directive == SortDirective::None {
        return;
    }
    tasks.sort_by(|a, b| primary(a, b, directive, now).then_with(|| tie_break(a, b)));
}

fn primary(a: &HazardTask, b: &HazardTask, directive: SortDirective, now: DateTime<Utc>) -> Ordering {
    match directive {
        SortDirective::None => Ordering::Equal,
        SortDirective::Column(key, dir) => {
            let cmp = match key {
                ColumnKey::Timestamp => a.timestamp.cmp(&b.timestamp),
                ColumnKey::Site => a.site.cmp(&b.site),
                ColumnKey::Location => a.location.cmp(&b.location),
                ColumnKey::Relevance(t) => relevance(a, t).cmp(&relevance(b, t)),
                ColumnKey::TimeLeft => {
                    hours_left(a.sla_deadline(), now).cmp(&hours_left(b.sla_deadline(), now))
                }
            };
            match dir {
                SortDir::Asc => cmp,
                SortDir::Desc => cmp.reverse(),
            }
        }
        SortDirective::Label(t, order) => match order {
            LabelOrder::RelevanceDesc => relevance(b, t).cmp(&relevance(a, t)),
            LabelOrder::RelevanceAsc => relevance(a, t).cmp(&relevance(b, t)),
            LabelOrder::SlaAsc => (a.sla_deadline() - now).cmp(&(b.sla_deadline() - now)),
            LabelOrder::SlaDesc => (b.sla_deadline() - now).cmp(&(a.sla_deadline() - now)),
            LabelOrder::Newest => b.timestamp.cmp(&a.timestamp),
            LabelOrder::Oldest => a.timestamp.cmp(&b.timestamp),
        },
    }
}

fn relevance(task: &HazardTask, taxonomy: Taxonomy) -> u8 {
    task.field(taxonomy).top_relevance()
}

/// Newest report first, then id ascending.
fn tie_break(a: &HazardTask, b: &HazardTask) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{t0, task_with};
    use chrono::Duration;

    fn ids(tasks: &[Arc<HazardTask>]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn column_toggle_cycles_asc_desc_off() {
        let s = SortDirective::None.toggle_column(ColumnKey::Site);
        assert_eq!(s, SortDirective::Column(ColumnKey::Site, SortDir::Asc));
        let s = s.toggle_column(ColumnKey::Site);
        assert_eq!(s, SortDirective::Column(ColumnKey::Site, SortDir::Desc));
        assert_eq!(s.toggle_column(ColumnKey::Site), SortDirective::None);
        assert_eq!(
            s.toggle_column(ColumnKey::TimeLeft),
            SortDirective::Column(ColumnKey::TimeLeft, SortDir::Asc)
        );
    }

    #[test]
    fn label_sort_excludes_column_sort() {
        let s = SortDirective::None.toggle_column(ColumnKey::Site);
        let s = s.with_label_sort(Taxonomy::Gr, Some(LabelOrder::Newest));
        assert_eq!(s, SortDirective::Label(Taxonomy::Gr, LabelOrder::Newest));
        assert_eq!(s.with_label_sort(Taxonomy::Tbc, None), s);
        assert_eq!(s.with_label_sort(Taxonomy::Gr, None), SortDirective::None);
        assert_eq!(
            s.toggle_column(ColumnKey::Site),
            SortDirective::Column(ColumnKey::Site, SortDir::Asc)
        );
    }

    #[test]
    fn relevance_sort_ranks_missing_candidates_as_zero() {
        let mut tasks = vec![
            Arc::new(task_with("A", t0(), 60, None)),
            Arc::new(task_with("B", t0(), 0, None)),
            Arc::new(task_with("C", t0(), 90, None)),
        ];
        sort_tasks(
            &mut tasks,
            SortDirective::Label(Taxonomy::Tbc, LabelOrder::RelevanceDesc),
            t0(),
        );
        assert_eq!(ids(&tasks), ["C", "A", "B"]);
    }

    #[test]
    fn ties_break_on_newest_then_id() {
        let mut tasks = vec![
            Arc::new(task_with("B", t0(), 50, None)),
            Arc::new(task_with("A", t0(), 50, None)),
            Arc::new(task_with("Z", t0() + Duration::hours(1), 50, None)),
        ];
        sort_tasks(
            &mut tasks,
            SortDirective::Column(ColumnKey::Relevance(Taxonomy::Tbc), SortDir::Desc),
            t0(),
        );
        assert_eq!(ids(&tasks), ["Z", "A", "B"]);
    }

    #[test]
    fn time_left_uses_floored_hours() {
        let now = t0();
        let mut tasks = vec![
            Arc::new(task_with("A", t0(), 50, Some(now + Duration::minutes(150)))),
            Arc::new(task_with("B", t0(), 50, Some(now + Duration::minutes(130)))),
            Arc::new(task_with("C", t0(), 50, Some(now + Duration::minutes(30)))),
        ];
        sort_tasks(
            &mut tasks,
            SortDirective::Column(ColumnKey::TimeLeft, SortDir::Asc),
            now,
        );
        assert_eq!(ids(&tasks), ["C", "A", "B"]);

        sort_tasks(&mut tasks, SortDirective::Label(Taxonomy::Gr, LabelOrder::SlaAsc), now);
        assert_eq!(ids(&tasks), ["C", "B", "A"]);
    }

    #[test]
    fn none_keeps_input_order() {
        let mut tasks = vec![
            Arc::new(task_with("B", t0(), 10, None)),
            Arc::new(task_with("A", t0(), 90, None)),
        ];
        sort_tasks(&mut tasks, SortDirective::None, t0());
        assert_eq!(ids(&tasks), ["B", "A"]);
    }

    #[test]
    fn parses_keys_and_orders() {
        assert_eq!("pspp_rel".parse::<ColumnKey>().unwrap(), ColumnKey::Relevance(Taxonomy::Pspp));
        assert_eq!("lokasi".parse::<ColumnKey>().unwrap(), ColumnKey::Location);
        assert_eq!("sla_desc".parse::<LabelOrder>().unwrap(), LabelOrder::SlaDesc);
        assert!("bogus".parse::<LabelOrder>().is_err());
    }
}
