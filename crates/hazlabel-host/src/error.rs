use thiserror::Error;

use hazlabel_core::AnnotationError;
use hazlabel_store::StoreError;

use crate::config::ConfigError;

/// Rejection of a dashboard command. The last committed snapshot stays
/// visible whenever one of these is returned.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DashboardError {
    /// The annotation rejection behind this error, if it is one.
    pub fn annotation(&self) -> Option<&AnnotationError> {
        match self {
            Self::Annotation(e) => Some(e),
            _ => None,
        }
    }
}
