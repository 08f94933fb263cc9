//! In-memory task store with copy-on-write snapshots.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use hazlabel_core::{HazardReport, HazardTask, TaskStatus};

use crate::StoreError;

/// An immutable view of every task, in store order.
pub type Snapshot = Arc<Vec<Arc<HazardTask>>>;

/// Collection of hazard tasks.
///
/// Readers take a [`Snapshot`] and keep it as long as they like. Every write
/// builds a new snapshot that shares the untouched tasks, so a reader never
/// sees a half-applied change. Tasks are never deleted.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Snapshot,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from tasks, rejecting duplicate ids and invalid fields.
    pub fn from_tasks(tasks: Vec<HazardTask>) -> Result<Self, StoreError> {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            if !seen.insert(task.id.clone()) {
                return Err(StoreError::DuplicateTask(task.id));
            }
            task.validate().map_err(|source| StoreError::InvalidTask {
                id: task.id.clone(),
                source,
            })?;
            task.refresh_status(false);
            out.push(Arc::new(task));
        }
        Ok(Self {
            tasks: Arc::new(out),
        })
    }

    /// Ingest raw reports, each due `sla_hours` after `now`.
    pub fn from_reports(
        reports: Vec<HazardReport>,
        sla_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let tasks = reports
            .into_iter()
            .map(|report| {
                let id = report.id.clone();
                HazardTask::ingest(report, sla_hours, now)
                    .map_err(|source| StoreError::InvalidTask { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tasks(tasks)
    }

    // ── JSON import/export ──

    /// Load a JSON array of tasks.
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let raw = read_existing(path)?;
        let tasks: Vec<HazardTask> = serde_json::from_str(&raw)?;
        let store = Self::from_tasks(tasks)?;
        info!(count = store.len(), path = %path.display(), "loaded tasks");
        Ok(store)
    }

    /// Load a JSON array of reports and ingest them.
    pub fn load_reports_json(
        path: &Path,
        sla_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let raw = read_existing(path)?;
        let reports: Vec<HazardReport> = serde_json::from_str(&raw)?;
        let store = Self::from_reports(reports, sla_hours, now)?;
        info!(count = store.len(), path = %path.display(), "ingested reports");
        Ok(store)
    }

    /// Write the current snapshot as a JSON array.
    pub fn save_json(&self, path: &Path) -> Result<(), StoreError> {
        let tasks: Vec<&HazardTask> = self.tasks.iter().map(Arc::as_ref).collect();
        let json = serde_json::to_string_pretty(&tasks)?;
        std::fs::write(path, json)?;
        info!(count = tasks.len(), path = %path.display(), "saved tasks");
        Ok(())
    }

    // ── Reads ──

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.tasks)
    }

    pub fn get(&self, id: &str) -> Option<Arc<HazardTask>> {
        self.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn require(&self, id: &str) -> Result<Arc<HazardTask>, StoreError> {
        self.get(id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn count_by_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status() == status).count()
    }

    // ── Writes ──

    /// Swap in a new version of an existing task.
    pub fn replace(&mut self, task: HazardTask) -> Result<(), StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task.id)
            .ok_or_else(|| StoreError::TaskNotFound(task.id.clone()))?;
        let mut next: Vec<Arc<HazardTask>> = self.tasks.iter().cloned().collect();
        debug!(task = %task.id, "replacing task");
        next[idx] = Arc::new(task);
        self.tasks = Arc::new(next);
        Ok(())
    }

    /// Install a whole new snapshot, e.g. the output of a sweep.
    pub fn replace_all(&mut self, tasks: Vec<Arc<HazardTask>>) {
        self.tasks = Arc::new(tasks);
    }

    pub fn insert(&mut self, task: HazardTask) -> Result<(), StoreError> {
        if self.get(&task.id).is_some() {
            return Err(StoreError::DuplicateTask(task.id));
        }
        let mut next: Vec<Arc<HazardTask>> = self.tasks.iter().cloned().collect();
        next.push(Arc::new(task));
        self.tasks = Arc::new(next);
        Ok(())
    }
}

fn read_existing(path: &Path) -> Result<String, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
