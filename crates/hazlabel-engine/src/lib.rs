//! Annotation engine: human decisions, override selection, and the SLA sweep.

mod annotate;
mod selection;
mod sweep;

pub use annotate::{Agreement, Expiry, HumanDecision, decide, expire};
pub use selection::{OverrideDraft, SELECTABLE_RANKS, Selection};
pub use sweep::{FieldRef, SweepReport, sweep};
