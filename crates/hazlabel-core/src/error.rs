use thiserror::Error;

/// Rejections raised by label field transitions and selection resolution.
///
/// Every variant is a recoverable value; callers keep the last committed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("field is already locked")]
    AlreadyLocked,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("field has no AI candidates to confirm")]
    NoCandidates,

    #[error("SLA deadline has not been reached")]
    DeadlineNotReached,

    #[error("another field is already being edited")]
    EditConflict,

    #[error("task has already been submitted")]
    TaskCompleted,

    #[error("candidate relevance {0} is outside 0-100")]
    RelevanceOutOfRange(i64),

    #[error("unknown taxonomy: {0}")]
    UnknownTaxonomy(String),
}
