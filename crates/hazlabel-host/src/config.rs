//! Dashboard configuration, loaded from TOML.
//!
//! ```toml
//! evaluator = "Rina Kusuma"
//! page_size = 10
//! sweep_interval_secs = 30
//! sla_hours = 48
//! enforce_deadline_on_commit = true
//! ```
//!
//! Every key is optional and falls back to [`DashboardConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hazlabel_core::{DEFAULT_SLA_HOURS, MAX_SLA_HOURS};
use hazlabel_store::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Display name recorded on human decisions and submissions.
    pub evaluator: String,
    pub page_size: usize,
    pub sweep_interval_secs: u64,
    /// SLA window applied when ingesting new reports.
    pub sla_hours: i64,
    /// Auto-confirm an expired task before applying a human commit to it.
    pub enforce_deadline_on_commit: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            evaluator: "evaluator".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sweep_interval_secs: 30,
            sla_hours: DEFAULT_SLA_HOURS,
            enforce_deadline_on_commit: true,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Reject values the dashboard cannot run with, listing every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.evaluator.trim().is_empty() {
            errors.push("evaluator must not be blank".to_string());
        }
        if self.page_size == 0 {
            errors.push("page_size must be > 0".to_string());
        }
        if self.sweep_interval_secs == 0 {
            errors.push("sweep_interval_secs must be > 0".to_string());
        }
        if !(1..=MAX_SLA_HOURS).contains(&self.sla_hours) {
            errors.push(format!(
                "sla_hours must be between 1 and {MAX_SLA_HOURS}, got {}",
                self.sla_hours
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
