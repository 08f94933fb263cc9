//! Table interaction state: active row, active cell, and the single open editor.
//!
//! At most one label field is edited at a time across the whole table. The
//! controller is advisory; the label field's own `locked` flag is what
//! actually guards the data.

use hazlabel_core::{AnnotationError, Taxonomy};
use hazlabel_store::TaskStore;

/// Table columns, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Timestamp,
    Id,
    PicCompany,
    Site,
    Location,
    DetailLocation,
    Nonconformity,
    SubNonconformity,
    Description,
    Label(Taxonomy),
    TimeLeft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    RowSelected(String),
    CellSelected(String, Column),
    Editing(String, Taxonomy),
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The field under edit, if any.
    pub fn editing(&self) -> Option<(&str, Taxonomy)> {
        match &self.state {
            InteractionState::Editing(id, taxonomy) => Some((id.as_str(), *taxonomy)),
            _ => None,
        }
    }

    pub fn is_editing_task(&self, task_id: &str) -> bool {
        self.editing().is_some_and(|(id, _)| id == task_id)
    }

    /// Row that is selected, has a selected cell, or is being edited.
    pub fn active_row(&self) -> Option<&str> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::RowSelected(id)
            | InteractionState::CellSelected(id, _)
            | InteractionState::Editing(id, _) => Some(id),
        }
    }

    /// Select `task_id`, or deselect it if it is already active.
    /// Ignored while a field is being edited.
    pub fn toggle_row(&mut self, task_id: &str) {
        self.state = match &self.state {
            InteractionState::Editing(..) => return,
            InteractionState::RowSelected(id) | InteractionState::CellSelected(id, _)
                if id == task_id =>
            {
                InteractionState::Idle
            }
            _ => InteractionState::RowSelected(task_id.to_string()),
        };
    }

    /// Ignored while a field is being edited.
    pub fn select_cell(&mut self, task_id: &str, column: Column) {
        if self.editing().is_none() {
            self.state = InteractionState::CellSelected(task_id.to_string(), column);
        }
    }

    /// Open the editor on one field. Reopening the same field is a no-op.
    pub fn open_edit(&mut self, task_id: &str, taxonomy: Taxonomy) -> Result<(), AnnotationError> {
        match self.editing() {
            Some((id, t)) if id == task_id && t == taxonomy => Ok(()),
            Some(_) => Err(AnnotationError::EditConflict),
            None => {
                self.state = InteractionState::Editing(task_id.to_string(), taxonomy);
                Ok(())
            }
        }
    }

    /// Close the editor on a cancel or successful commit, keeping the row
    /// active. Returns false when that field was not being edited.
    pub fn close_edit(&mut self, task_id: &str, taxonomy: Taxonomy) -> bool {
        match self.editing() {
            Some((id, t)) if id == task_id && t == taxonomy => {
                self.state = InteractionState::RowSelected(task_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Step back one level: editor to row, row or cell to nothing.
    pub fn escape(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            InteractionState::Editing(id, _) => InteractionState::RowSelected(id),
            InteractionState::Idle
            | InteractionState::RowSelected(_)
            | InteractionState::CellSelected(..) => InteractionState::Idle,
        };
    }

    /// Release the editor if its field was locked elsewhere (e.g. by a sweep)
    /// or its task no longer exists. Returns the released field.
    pub fn reconcile(&mut self, store: &TaskStore) -> Option<(String, Taxonomy)> {
        let (id, taxonomy) = self.editing()?;
        let (id, taxonomy) = (id.to_string(), taxonomy);
        match store.get(&id) {
            Some(task) if !task.field(taxonomy).is_locked() => None,
            Some(_) => {
                self.state = InteractionState::RowSelected(id.clone());
                Some((id, taxonomy))
            }
            None => {
                self.state = InteractionState::Idle;
                Some((id, taxonomy))
            }
        }
    }

    /// False while a different field is being edited.
    pub fn can_edit(&self, task_id: &str, taxonomy: Taxonomy) -> bool {
        match self.editing() {
            Some((id, t)) => id == task_id && t == taxonomy,
            None => true,
        }
    }

    /// True when another row holds the editor.
    pub fn is_dimmed(&self, task_id: &str) -> bool {
        self.editing().is_some_and(|(id, _)| id != task_id)
    }

    /// Active or edited rows show their text in full.
    pub fn is_expanded(&self, task_id: &str) -> bool {
        self.active_row() == Some(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hazlabel_core::{AICandidate, HazardReport, HazardTask};

    fn store_with(id: &str, lock: Option<Taxonomy>) -> TaskStore {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let report = HazardReport {
            id: id.into(),
            timestamp: now,
            tbc: vec![AICandidate::new("7. LOTO", 80, "").unwrap()],
            pspp: vec![AICandidate::new("7. LOTO", 80, "").unwrap()],
            gr: vec![AICandidate::new("7. LOTO", 80, "").unwrap()],
            ..Default::default()
        };
        let mut task = HazardTask::ingest(report, 0, now).unwrap();
        if let Some(t) = lock {
            task.field_mut(t).apply_auto_confirm(now, now).unwrap();
        }
        TaskStore::from_tasks(vec![task]).unwrap()
    }

    #[test]
    fn toggle_row_selects_and_deselects() {
        let mut ctl = InteractionController::new();
        ctl.toggle_row("H-1");
        assert_eq!(ctl.state(), &InteractionState::RowSelected("H-1".into()));
        ctl.toggle_row("H-2");
        assert_eq!(ctl.active_row(), Some("H-2"));
        ctl.toggle_row("H-2");
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn second_editor_conflicts() {
        let mut ctl = InteractionController::new();
        ctl.open_edit("H-1", Taxonomy::Tbc).unwrap();
        ctl.open_edit("H-1", Taxonomy::Tbc).unwrap();
        assert_eq!(
            ctl.open_edit("H-1", Taxonomy::Gr),
            Err(AnnotationError::EditConflict)
        );
        assert_eq!(
            ctl.open_edit("H-2", Taxonomy::Tbc),
            Err(AnnotationError::EditConflict)
        );
        assert_eq!(ctl.editing(), Some(("H-1", Taxonomy::Tbc)));
        assert!(!ctl.can_edit("H-2", Taxonomy::Tbc));
        assert!(ctl.can_edit("H-1", Taxonomy::Tbc));
        assert!(ctl.is_dimmed("H-2"));
        assert!(!ctl.is_dimmed("H-1"));
        assert!(ctl.is_expanded("H-1"));
    }

    #[test]
    fn selection_is_frozen_while_editing() {
        let mut ctl = InteractionController::new();
        ctl.open_edit("H-1", Taxonomy::Pspp).unwrap();
        ctl.toggle_row("H-2");
        ctl.select_cell("H-2", Column::Site);
        assert_eq!(ctl.editing(), Some(("H-1", Taxonomy::Pspp)));
    }

    #[test]
    fn close_edit_keeps_row_active() {
        let mut ctl = InteractionController::new();
        ctl.open_edit("H-1", Taxonomy::Gr).unwrap();
        assert!(!ctl.close_edit("H-1", Taxonomy::Tbc));
        assert!(ctl.close_edit("H-1", Taxonomy::Gr));
        assert_eq!(ctl.state(), &InteractionState::RowSelected("H-1".into()));
    }

    #[test]
    fn escape_steps_back_one_level() {
        let mut ctl = InteractionController::new();
        ctl.select_cell("H-1", Column::Label(Taxonomy::Tbc));
        ctl.escape();
        assert_eq!(ctl.state(), &InteractionState::Idle);

        ctl.open_edit("H-1", Taxonomy::Tbc).unwrap();
        ctl.escape();
        assert_eq!(ctl.state(), &InteractionState::RowSelected("H-1".into()));
        ctl.escape();
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn reconcile_releases_locked_or_missing_fields() {
        let mut ctl = InteractionController::new();
        ctl.open_edit("H-1", Taxonomy::Tbc).unwrap();
        assert_eq!(ctl.reconcile(&store_with("H-1", None)), None);
        assert!(ctl.editing().is_some());

        assert_eq!(
            ctl.reconcile(&store_with("H-1", Some(Taxonomy::Tbc))),
            Some(("H-1".to_string(), Taxonomy::Tbc))
        );
        assert_eq!(ctl.state(), &InteractionState::RowSelected("H-1".into()));

        ctl.open_edit("H-1", Taxonomy::Gr).unwrap();
        ctl.reconcile(&store_with("H-9", None));
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }
}
