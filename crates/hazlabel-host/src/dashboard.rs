//! The dashboard: one owner for the store, view and interaction state.
//!
//! Every command is synchronous and runs to completion. Writes go through
//! the annotation engine, replace the touched task in the store, and publish
//! the new snapshot on a `watch` channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use hazlabel_core::{AnnotationError, Clock, HazardReport, HazardTask, Taxonomy, derive_status};
use hazlabel_engine::{HumanDecision, OverrideDraft, SweepReport, decide, expire, sweep};
use hazlabel_store::{
    ColumnKey, FieldFilters, FilterOptions, LabelFilter, LabelOrder, Snapshot, TaskStore,
    run_query, total_pages,
};

use crate::audit::{AuditLog, AuditRecord, LABEL_AUTO_CONFIRMED, LABEL_DECIDED, TASK_SUBMITTED};
use crate::config::DashboardConfig;
use crate::interaction::{Column, InteractionController};
use crate::view::{TableView, ViewState, render};
use crate::DashboardError;

pub struct Dashboard {
    store: TaskStore,
    clock: Arc<dyn Clock>,
    config: DashboardConfig,
    interaction: InteractionController,
    view: ViewState,
    audit: AuditLog,
    publisher: watch::Sender<Snapshot>,
}

impl Dashboard {
    pub fn new(
        store: TaskStore,
        config: DashboardConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let (publisher, _) = watch::channel(store.snapshot());
        info!(
            tasks = store.len(),
            evaluator = %config.evaluator,
            "dashboard ready"
        );
        Ok(Self {
            store,
            clock,
            config,
            interaction: InteractionController::new(),
            view: ViewState::default(),
            audit: AuditLog::default(),
            publisher,
        })
    }

    // ── Reads ──

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn audit_log(&self) -> &[AuditRecord] {
        self.audit.entries()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Receive every snapshot published after a write.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    pub fn task(&self, task_id: &str) -> Result<Arc<HazardTask>, DashboardError> {
        Ok(self.store.require(task_id)?)
    }

    /// The current page of the table.
    pub fn view(&self) -> TableView {
        render(
            &self.store.snapshot(),
            &self.view,
            &self.interaction,
            self.config.page_size,
            self.clock.now(),
        )
    }

    /// Every task matching the current filters, in view order.
    pub fn results(&self) -> Vec<Arc<HazardTask>> {
        run_query(&self.store.snapshot(), self.view.params(), self.clock.now())
    }

    pub fn filter_options(&self) -> FilterOptions {
        let snapshot = self.store.snapshot();
        FilterOptions::from_tasks(snapshot.iter().map(Arc::as_ref))
    }

    // ── Annotation commands ──

    /// Decide one field with an explicit label and note.
    ///
    /// With `enforce_deadline_on_commit`, an expired task is auto-confirmed
    /// first, so a late commit on a field with candidates fails with
    /// `AlreadyLocked`.
    pub fn apply_human_decision(
        &mut self,
        task_id: &str,
        taxonomy: Taxonomy,
        label: &str,
        note: &str,
    ) -> Result<Arc<HazardTask>, DashboardError> {
        let now = self.clock.now();
        let mut task = self.store.require(task_id)?;
        let mut expired = false;

        if self.config.enforce_deadline_on_commit {
            let expiry = expire(&task, now);
            if let Some(next) = expiry.task {
                expired = true;
                self.store.replace(next)?;
                for t in &expiry.confirmed {
                    self.audit_auto_confirm(task_id, *t, now);
                }
                self.reconcile();
                task = self.store.require(task_id)?;
            }
        }

        let decision = HumanDecision {
            label,
            note,
            evaluator: &self.config.evaluator,
        };
        let next = match decide(&task, taxonomy, decision, now) {
            Ok(next) => next,
            Err(e) => {
                warn!(
                    task = task_id,
                    taxonomy = taxonomy.as_str(),
                    error = %e,
                    "decision rejected"
                );
                if expired {
                    self.publish();
                }
                return Err(e.into());
            }
        };

        self.store.replace(next)?;
        self.audit.record(
            LABEL_DECIDED,
            field_resource(task_id, taxonomy),
            format!("'{label}' by {}: {}", self.config.evaluator, note.trim()),
            now,
        );
        self.with_interaction(|i| {
            i.close_edit(task_id, taxonomy);
        });
        self.publish();
        Ok(self.store.require(task_id)?)
    }

    /// Resolve an override draft against the field and commit it.
    pub fn commit_override(
        &mut self,
        task_id: &str,
        taxonomy: Taxonomy,
        draft: &OverrideDraft,
    ) -> Result<Arc<HazardTask>, DashboardError> {
        let task = self.store.require(task_id)?;
        let (label, note) = draft.resolve(task.field(taxonomy).candidates(), taxonomy.options())?;
        self.apply_human_decision(task_id, taxonomy, &label, &note)
    }

    /// Mark a task completed. Returns the id of the next task in the current
    /// view, if any.
    pub fn submit_task(
        &mut self,
        task_id: &str,
        justification: Option<&str>,
    ) -> Result<Option<String>, DashboardError> {
        let now = self.clock.now();
        let mut next = (*self.store.require(task_id)?).clone();
        if let Err(e) = next.submit(&self.config.evaluator, justification, now) {
            warn!(task = task_id, error = %e, "submission rejected");
            return Err(e.into());
        }
        self.store.replace(next)?;
        if self.interaction.is_editing_task(task_id) {
            self.interaction.escape();
        }
        self.audit.record(
            TASK_SUBMITTED,
            task_id,
            format!("submitted by {}", self.config.evaluator),
            now,
        );
        self.publish();

        let results = self.results();
        let following = results
            .iter()
            .skip_while(|t| t.id != task_id)
            .nth(1)
            .map(|t| t.id.clone());
        Ok(following)
    }

    /// Ingest a new report, due `sla_hours` from now.
    pub fn ingest_report(&mut self, report: HazardReport) -> Result<Arc<HazardTask>, DashboardError> {
        let id = report.id.clone();
        let task = HazardTask::ingest(report, self.config.sla_hours, self.clock.now())?;
        self.store.insert(task)?;
        info!(task = %id, "report ingested");
        self.publish();
        Ok(self.store.require(&id)?)
    }

    /// Auto-confirm every expired field. Called by the scheduler.
    pub fn run_sweep(&mut self) -> SweepReport {
        let now = self.clock.now();
        let report = sweep(&self.store.snapshot(), now);
        if report.is_noop() {
            return report;
        }
        self.store.replace_all(report.tasks.clone());
        for (id, taxonomy) in &report.confirmed {
            self.audit_auto_confirm(id, *taxonomy, now);
        }
        self.reconcile();
        self.publish();
        report
    }

    // ── Interaction commands ──

    pub fn open_edit(&mut self, task_id: &str, taxonomy: Taxonomy) -> Result<(), DashboardError> {
        let task = self.store.require(task_id)?;
        if task.field(taxonomy).is_locked() {
            return Err(AnnotationError::AlreadyLocked.into());
        }
        Ok(self.with_interaction(|i| i.open_edit(task_id, taxonomy))?)
    }

    pub fn close_edit(&mut self, task_id: &str, taxonomy: Taxonomy) -> bool {
        self.with_interaction(|i| i.close_edit(task_id, taxonomy))
    }

    pub fn escape(&mut self) {
        self.with_interaction(InteractionController::escape);
    }

    pub fn toggle_row(&mut self, task_id: &str) {
        self.with_interaction(|i| i.toggle_row(task_id));
    }

    pub fn select_cell(&mut self, task_id: &str, column: Column) {
        self.with_interaction(|i| i.select_cell(task_id, column));
    }

    // ── View commands ──

    pub fn set_search(&mut self, search: &str) -> bool {
        self.view.set_search(search)
    }

    pub fn set_field_filters(&mut self, filters: FieldFilters) -> bool {
        self.view.set_field_filters(filters)
    }

    pub fn set_label_filter(&mut self, taxonomy: Taxonomy, filter: LabelFilter) -> bool {
        self.view.set_label_filter(taxonomy, filter)
    }

    pub fn clear_label_filters(&mut self) -> bool {
        self.view.clear_label_filters()
    }

    pub fn toggle_column_sort(&mut self, key: ColumnKey) -> bool {
        self.view.toggle_column_sort(key)
    }

    pub fn set_label_sort(&mut self, taxonomy: Taxonomy, order: Option<LabelOrder>) -> bool {
        self.view.set_label_sort(taxonomy, order)
    }

    /// Jump to page `page`, clamped to the pages the current query has.
    pub fn set_page(&mut self, page: usize) -> usize {
        let total = total_pages(self.results().len(), self.config.page_size);
        self.view.set_page(page);
        self.view.clamp_page(total);
        self.view.page()
    }

    // ── Internals ──

    fn publish(&self) {
        self.publisher.send_replace(self.store.snapshot());
    }

    fn audit_auto_confirm(&mut self, task_id: &str, taxonomy: Taxonomy, now: DateTime<Utc>) {
        let label = self
            .store
            .get(task_id)
            .and_then(|t| t.field(taxonomy).human_label().map(str::to_string))
            .unwrap_or_default();
        self.audit.record(
            LABEL_AUTO_CONFIRMED,
            field_resource(task_id, taxonomy),
            format!("'{label}' confirmed at SLA expiry"),
            now,
        );
    }

    /// Run an interaction change and keep the `in_progress` status of the
    /// affected tasks in step with it.
    fn with_interaction<R>(&mut self, f: impl FnOnce(&mut InteractionController) -> R) -> R {
        let before = self.editing_task();
        let out = f(&mut self.interaction);
        let after = self.editing_task();
        if before != after {
            for id in [before, after].into_iter().flatten() {
                self.refresh_status(&id);
            }
            self.publish();
        }
        out
    }

    /// Release an editor whose field was locked by someone else.
    fn reconcile(&mut self) {
        if let Some((id, taxonomy)) = self.interaction.reconcile(&self.store) {
            warn!(
                task = %id,
                taxonomy = taxonomy.as_str(),
                "field locked while being edited, editor released"
            );
            self.refresh_status(&id);
        }
    }

    fn editing_task(&self) -> Option<String> {
        self.interaction.editing().map(|(id, _)| id.to_string())
    }

    fn refresh_status(&mut self, task_id: &str) {
        let Some(task) = self.store.get(task_id) else {
            return;
        };
        let editing = self.interaction.is_editing_task(task_id);
        if derive_status(&task, editing) == task.status() {
            return;
        }
        let mut next = (*task).clone();
        next.refresh_status(editing);
        if let Err(e) = self.store.replace(next) {
            warn!(task = task_id, error = %e, "status refresh failed");
        }
    }
}

fn field_resource(task_id: &str, taxonomy: Taxonomy) -> String {
    format!("{task_id}/{}", taxonomy.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hazlabel_core::{AICandidate, AUTO_CONFIRM_NOTE, LabelState, ManualClock, TaskStatus};
    use hazlabel_store::SortDirective;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    fn candidates(top: i64) -> Vec<AICandidate> {
        vec![
            AICandidate::new("7. LOTO", top, "energy isolation").unwrap(),
            AICandidate::new("6. Pengamanan", top / 2, "guarding").unwrap(),
            AICandidate::new("2. Housekeeping", top / 3, "debris").unwrap(),
        ]
    }

    fn task(id: &str, deadline: DateTime<Utc>, top: i64) -> HazardTask {
        let report = HazardReport {
            id: id.into(),
            timestamp: t0(),
            site: "BMO 1".into(),
            tbc: candidates(top),
            pspp: candidates(top),
            gr: candidates(top),
            ..Default::default()
        };
        HazardTask::ingest(report, 0, deadline).unwrap()
    }

    fn dashboard(tasks: Vec<HazardTask>) -> (Dashboard, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let config = DashboardConfig {
            evaluator: "Rina".into(),
            ..Default::default()
        };
        let store = TaskStore::from_tasks(tasks).unwrap();
        let dash = Dashboard::new(store, config, clock.clone()).unwrap();
        (dash, clock)
    }

    #[test]
    fn three_minute_deadline_auto_confirms_whole_task() {
        let (mut dash, clock) = dashboard(vec![task("H-1", t0() + Duration::minutes(3), 80)]);

        clock.advance(Duration::minutes(2));
        assert!(dash.run_sweep().is_noop());

        clock.advance(Duration::minutes(1));
        let report = dash.run_sweep();
        assert_eq!(report.confirmed.len(), 3);

        let task = dash.task("H-1").unwrap();
        assert_eq!(task.status(), TaskStatus::AutoConfirmed);
        for (_, field) in task.fields() {
            assert_eq!(field.human_label(), Some("7. LOTO"));
            assert_eq!(field.annotation_note(), Some(AUTO_CONFIRM_NOTE));
            assert_eq!(field.annotated_by(), None);
        }
        assert_eq!(dash.audit_log().len(), 3);
        assert_eq!(dash.audit_log()[0].event_type, LABEL_AUTO_CONFIRMED);
    }

    #[test]
    fn override_then_sweep_keeps_human_field() {
        let (mut dash, clock) = dashboard(vec![task("H-1", t0() + Duration::minutes(3), 80)]);

        dash.open_edit("H-1", Taxonomy::Tbc).unwrap();
        let mut draft = OverrideDraft::new();
        draft.select_candidate(2).unwrap();
        draft.set_note("debris on the access ramp");
        let task = dash.commit_override("H-1", Taxonomy::Tbc, &draft).unwrap();
        assert_eq!(task.field(Taxonomy::Tbc).human_label(), Some("2. Housekeeping"));
        assert_eq!(task.field(Taxonomy::Tbc).annotated_by(), Some("Rina"));
        assert_eq!(task.status(), TaskStatus::HumanLocked);
        assert!(dash.interaction().editing().is_none());

        clock.advance(Duration::minutes(3));
        let report = dash.run_sweep();
        assert_eq!(report.confirmed.len(), 2);
        let task = dash.task("H-1").unwrap();
        assert_eq!(task.field(Taxonomy::Tbc).state(), LabelState::HumanDecided);
        assert_eq!(task.field(Taxonomy::Pspp).state(), LabelState::AutoConfirmed);
        assert_eq!(task.field(Taxonomy::Gr).state(), LabelState::AutoConfirmed);
    }

    #[test]
    fn already_locked_leaves_field_and_snapshot_unchanged() {
        let (mut dash, _) = dashboard(vec![task("H-1", t0() + Duration::hours(48), 80)]);
        dash.apply_human_decision("H-1", Taxonomy::Gr, "7. LOTO", "matches photo")
            .unwrap();
        let before = dash.snapshot();

        let err = dash
            .apply_human_decision("H-1", Taxonomy::Gr, "6. Pengamanan", "changed my mind")
            .unwrap_err();
        assert_eq!(err.annotation(), Some(&AnnotationError::AlreadyLocked));
        let after = dash.snapshot();
        assert!(Arc::ptr_eq(&before[0], &after[0]));
        assert_eq!(after[0].field(Taxonomy::Gr).human_label(), Some("7. LOTO"));
    }

    #[test]
    fn late_commit_loses_to_auto_confirm() {
        let (mut dash, clock) = dashboard(vec![task("H-1", t0() + Duration::minutes(3), 80)]);
        dash.open_edit("H-1", Taxonomy::Pspp).unwrap();
        clock.advance(Duration::minutes(4));

        let err = dash
            .apply_human_decision("H-1", Taxonomy::Pspp, "6. Pengamanan", "guarding")
            .unwrap_err();
        assert_eq!(err.annotation(), Some(&AnnotationError::AlreadyLocked));
        let task = dash.task("H-1").unwrap();
        assert!(task.field(Taxonomy::Pspp).is_auto_confirmed());
        assert_eq!(task.status(), TaskStatus::AutoConfirmed);
        assert!(dash.interaction().editing().is_none());
    }

    #[test]
    fn late_commit_wins_without_deadline_enforcement() {
        let clock = Arc::new(ManualClock::new(t0()));
        let config = DashboardConfig {
            evaluator: "Rina".into(),
            enforce_deadline_on_commit: false,
            ..Default::default()
        };
        let store = TaskStore::from_tasks(vec![task("H-1", t0(), 80)]).unwrap();
        let mut dash = Dashboard::new(store, config, clock).unwrap();

        dash.apply_human_decision("H-1", Taxonomy::Tbc, "6. Pengamanan", "guarding")
            .unwrap();
        let report = dash.run_sweep();
        assert_eq!(report.confirmed.len(), 2);
        let task = dash.task("H-1").unwrap();
        assert_eq!(task.field(Taxonomy::Tbc).state(), LabelState::HumanDecided);
    }

    #[test]
    fn editing_marks_task_in_progress() {
        let (mut dash, _) = dashboard(vec![
            task("H-1", t0() + Duration::hours(5), 80),
            task("H-2", t0() + Duration::hours(5), 80),
        ]);
        dash.open_edit("H-1", Taxonomy::Tbc).unwrap();
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::InProgress);

        let err = dash.open_edit("H-2", Taxonomy::Gr).unwrap_err();
        assert_eq!(err.annotation(), Some(&AnnotationError::EditConflict));
        let view = dash.view();
        let other = view.rows.iter().find(|r| r.task.id == "H-2").unwrap();
        assert!(other.dimmed);
        assert!(other.editable.is_empty());

        dash.escape();
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::AiPending);
        assert_eq!(dash.interaction().active_row(), Some("H-1"));
    }

    #[test]
    fn locked_fields_cannot_be_opened() {
        let (mut dash, _) = dashboard(vec![task("H-1", t0() + Duration::hours(5), 80)]);
        dash.apply_human_decision("H-1", Taxonomy::Tbc, "7. LOTO", "agree")
            .unwrap();
        let err = dash.open_edit("H-1", Taxonomy::Tbc).unwrap_err();
        assert_eq!(err.annotation(), Some(&AnnotationError::AlreadyLocked));
    }

    #[test]
    fn sweep_releases_editor_on_swept_field() {
        let (mut dash, clock) = dashboard(vec![task("H-1", t0() + Duration::minutes(1), 80)]);
        dash.open_edit("H-1", Taxonomy::Gr).unwrap();
        clock.advance(Duration::minutes(1));
        dash.run_sweep();
        assert!(dash.interaction().editing().is_none());
        assert_eq!(dash.interaction().active_row(), Some("H-1"));
    }

    #[test]
    fn submit_completes_and_points_to_next_task() {
        let (mut dash, _) = dashboard(vec![
            task("H-1", t0() + Duration::hours(5), 80),
            task("H-2", t0() + Duration::hours(5), 80),
        ]);
        let following = dash.submit_task("H-1", Some("reviewed")).unwrap();
        assert_eq!(following.as_deref(), Some("H-2"));
        let task = dash.task("H-1").unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.submitted_by(), Some("Rina"));

        let err = dash.submit_task("H-1", None).unwrap_err();
        assert_eq!(err.annotation(), Some(&AnnotationError::TaskCompleted));
        assert_eq!(dash.submit_task("H-2", None).unwrap(), None);
        assert_eq!(dash.audit_log().len(), 2);
    }

    #[test]
    fn closing_editor_after_failed_commit_restores_pending() {
        let (mut dash, _) = dashboard(vec![task("H-1", t0() + Duration::hours(5), 80)]);
        dash.open_edit("H-1", Taxonomy::Pspp).unwrap();
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::InProgress);

        let draft = OverrideDraft::new();
        assert!(dash.commit_override("H-1", Taxonomy::Pspp, &draft).is_err());
        assert!(dash.close_edit("H-1", Taxonomy::Pspp));
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::AiPending);
        assert!(dash.audit_log().is_empty());
    }

    #[test]
    fn submit_releases_editor_on_that_task() {
        let (mut dash, _) = dashboard(vec![
            task("H-1", t0() + Duration::hours(5), 80),
            task("H-2", t0() + Duration::hours(5), 80),
        ]);
        dash.open_edit("H-1", Taxonomy::Gr).unwrap();
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::InProgress);

        dash.submit_task("H-1", None).unwrap();
        assert!(dash.interaction().editing().is_none());
        assert_eq!(dash.interaction().active_row(), Some("H-1"));
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::Completed);

        dash.open_edit("H-2", Taxonomy::Tbc).unwrap();
        dash.submit_task("H-1", None).unwrap_err();
        assert_eq!(dash.interaction().editing(), Some(("H-2", Taxonomy::Tbc)));
    }

    #[test]
    fn completed_task_survives_sweep_and_late_decision() {
        let (mut dash, clock) = dashboard(vec![task("H-1", t0() + Duration::minutes(1), 80)]);
        dash.submit_task("H-1", None).unwrap();
        clock.advance(Duration::minutes(5));
        assert!(dash.run_sweep().is_noop());
        dash.apply_human_decision("H-1", Taxonomy::Tbc, "7. LOTO", "after submit")
            .unwrap();
        assert_eq!(dash.task("H-1").unwrap().status(), TaskStatus::Completed);
    }

    #[test]
    fn label_filter_sort_and_clear() {
        let deadline = t0() + Duration::hours(10);
        let (mut dash, _) = dashboard(vec![
            task("A", deadline, 40),
            task("B", deadline, 99),
            task("C", deadline, 90),
            task("D", deadline, 70),
        ]);
        dash.apply_human_decision("B", Taxonomy::Gr, "7. LOTO", "agree").unwrap();

        dash.set_label_filter(Taxonomy::Gr, LabelFilter::Waiting);
        dash.set_label_sort(Taxonomy::Gr, Some(LabelOrder::RelevanceDesc));
        let ids: Vec<_> = dash.view().rows.iter().map(|r| r.task.id.clone()).collect();
        assert_eq!(ids, ["C", "D", "A"]);

        dash.set_label_sort(Taxonomy::Gr, None);
        assert_eq!(dash.view_state().params().sort, SortDirective::None);
        let ids: Vec<_> = dash.view().rows.iter().map(|r| r.task.id.clone()).collect();
        assert_eq!(ids, ["A", "C", "D"]);
    }

    #[test]
    fn pages_clamp_and_reset() {
        let deadline = t0() + Duration::hours(10);
        let tasks = (0..23).map(|i| task(&format!("H-{i:02}"), deadline, 80)).collect();
        let (mut dash, _) = dashboard(tasks);

        assert_eq!(dash.set_page(9), 3);
        let view = dash.view();
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows.len(), 3);

        dash.set_search("H-1");
        assert_eq!(dash.view_state().page(), 1);
        let view = dash.view();
        assert_eq!(view.total_results, 10);
        assert_eq!(view.total_pages, 1);

        dash.set_search("nothing");
        let view = dash.view();
        assert_eq!(view.page, 1);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn writes_publish_snapshots() {
        let (mut dash, _) = dashboard(vec![task("H-1", t0() + Duration::hours(5), 80)]);
        let mut rx = dash.subscribe();
        assert!(!rx.has_changed().unwrap());
        dash.apply_human_decision("H-1", Taxonomy::Tbc, "7. LOTO", "agree")
            .unwrap();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot[0].field(Taxonomy::Tbc).is_locked());
    }

    #[test]
    fn ingest_uses_configured_sla() {
        let (mut dash, _) = dashboard(vec![]);
        let report = HazardReport {
            id: "N-1".into(),
            timestamp: t0(),
            tbc: candidates(60),
            ..Default::default()
        };
        let task = dash.ingest_report(report).unwrap();
        assert_eq!(task.sla_deadline(), t0() + Duration::hours(48));
        assert_eq!(dash.filter_options().labels[&Taxonomy::Tbc], vec!["7. LOTO"]);
    }
}
