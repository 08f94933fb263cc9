//! View state (query inputs and page number) and the rendered table view.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use hazlabel_core::{HazardTask, Taxonomy, TimeRemaining, time_remaining};
use hazlabel_store::{
    ColumnKey, FieldFilters, LabelFilter, LabelFilters, LabelOrder, QueryParams, RowFlags,
    paginate, run_query,
};

use crate::interaction::InteractionController;

/// Query inputs plus the requested page.
///
/// Any change to the query inputs sends the view back to page 1. Setting a
/// value equal to the current one changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    params: QueryParams,
    page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            params: QueryParams::default(),
            page: 1,
        }
    }
}

impl ViewState {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn page(&self) -> usize {
        self.page
    }

    fn update(&mut self, f: impl FnOnce(&mut QueryParams)) -> bool {
        let before = self.params.clone();
        f(&mut self.params);
        let changed = self.params != before;
        if changed {
            self.page = 1;
            debug!(params = ?self.params, "query changed, back to page 1");
        }
        changed
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        self.update(|p| p.search = search.to_string())
    }

    pub fn set_field_filters(&mut self, filters: FieldFilters) -> bool {
        self.update(|p| p.field_filters = filters)
    }

    pub fn set_label_filter(&mut self, taxonomy: Taxonomy, filter: LabelFilter) -> bool {
        self.update(|p| p.label_filters.set(taxonomy, filter))
    }

    pub fn clear_label_filters(&mut self) -> bool {
        self.update(|p| p.label_filters = LabelFilters::default())
    }

    pub fn toggle_column_sort(&mut self, key: ColumnKey) -> bool {
        self.update(|p| p.sort = p.sort.toggle_column(key))
    }

    pub fn set_label_sort(&mut self, taxonomy: Taxonomy, order: Option<LabelOrder>) -> bool {
        self.update(|p| p.sort = p.sort.with_label_sort(taxonomy, order))
    }

    /// Requested page; clamped when the view is rendered.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Pull the stored page back into `1..=total_pages`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.page = hazlabel_store::clamp_page(self.page, total_pages);
    }
}

/// One rendered table row.
#[derive(Debug, Clone)]
pub struct Row {
    pub task: Arc<HazardTask>,
    pub flags: RowFlags,
    pub countdown: TimeRemaining,
    pub active: bool,
    pub dimmed: bool,
    pub expanded: bool,
    /// Taxonomies whose cell may open an editor right now.
    pub editable: BTreeSet<Taxonomy>,
}

/// The current page of the table, derived from a snapshot.
#[derive(Debug, Clone)]
pub struct TableView {
    pub rows: Vec<Row>,
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub page_size: usize,
    pub active_filters: usize,
}

/// Filter, sort and paginate `tasks`, then decorate each row.
pub fn render(
    tasks: &[Arc<HazardTask>],
    state: &ViewState,
    interaction: &InteractionController,
    page_size: usize,
    now: DateTime<Utc>,
) -> TableView {
    let results = run_query(tasks, state.params(), now);
    let page = paginate(&results, state.page(), page_size);
    let rows = page
        .items
        .into_iter()
        .map(|task| {
            let editable = Taxonomy::ALL
                .into_iter()
                .filter(|t| !task.field(*t).is_locked() && interaction.can_edit(&task.id, *t))
                .collect();
            Row {
                flags: RowFlags::of(&task, now),
                countdown: time_remaining(task.sla_deadline(), now),
                active: interaction.active_row() == Some(task.id.as_str()),
                dimmed: interaction.is_dimmed(&task.id),
                expanded: interaction.is_expanded(&task.id),
                editable,
                task,
            }
        })
        .collect();
    TableView {
        rows,
        page: page.page,
        total_pages: page.total_pages,
        total_results: page.total_results,
        page_size: page.page_size,
        active_filters: state.params().field_filters.active_count(),
    }
}
