//! Task storage and the read-side query pipeline: filter, sort, paginate.

mod error;
mod options;
mod page;
mod query;
mod sort;
mod store;

pub use error::StoreError;
pub use options::{FilterOptions, LOW_RELEVANCE_THRESHOLD, RowFlags, URGENT_HOURS};
pub use page::{DEFAULT_PAGE_SIZE, Page, clamp_page, paginate, total_pages};
pub use query::{
    ConfidenceBand, FieldFilters, LabelFilter, LabelFilters, QueryParams, TimeLeftBand, run_query,
};
pub use sort::{ColumnKey, LabelOrder, SortDir, SortDirective, sort_tasks};
pub use store::{Snapshot, TaskStore};
