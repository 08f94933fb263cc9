//! Periodic SLA sweep.
//!
//! The ticker holds no domain logic: it locks the dashboard for one
//! [`Dashboard::run_sweep`] per period and lets the dashboard publish.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::Dashboard;

/// Spawn a background task that sweeps every `period`, first after one
/// full period. Stop it with [`JoinHandle::abort`].
pub fn spawn_sweeper(dashboard: Arc<Mutex<Dashboard>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let report = dashboard
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .run_sweep();
            debug!(
                confirmed = report.confirmed.len(),
                skipped = report.skipped.len(),
                "sweep tick"
            );
        }
    })
}
