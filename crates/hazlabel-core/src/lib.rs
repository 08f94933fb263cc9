pub mod clock;
pub mod error;
pub mod label;
pub mod task;
pub mod taxonomy;

pub use clock::{Clock, ManualClock, SystemClock, TimeRemaining, hours_left, time_remaining};
pub use error::AnnotationError;
pub use label::{AICandidate, AUTO_CONFIRM_NOTE, LabelField, LabelState};
pub use task::{
    DEFAULT_SLA_HOURS, HazardReport, HazardTask, MAX_SLA_HOURS, TaskStatus, derive_status,
};
pub use taxonomy::{TAXONOMY_OPTIONS, Taxonomy};
