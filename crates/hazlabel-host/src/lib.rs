//! Dashboard host: command surface, interaction state, view state,
//! configuration, audit trail and the background SLA sweeper.

mod audit;
mod config;
mod dashboard;
mod error;
mod interaction;
mod scheduler;
mod view;

pub use audit::{AuditLog, AuditRecord, LABEL_AUTO_CONFIRMED, LABEL_DECIDED, TASK_SUBMITTED};
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use interaction::{Column, InteractionController, InteractionState};
pub use scheduler::spawn_sweeper;
pub use view::{Row, TableView, ViewState};
