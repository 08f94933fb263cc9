use hazlabel_core::AnnotationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("duplicate task id: {0}")]
    DuplicateTask(String),

    #[error("invalid task {id}: {source}")]
    InvalidTask {
        id: String,
        #[source]
        source: AnnotationError,
    },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
