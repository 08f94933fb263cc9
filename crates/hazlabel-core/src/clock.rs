//! Time source and the advisory SLA countdown.
//!
//! Pure logic never reads the wall clock directly: callers pass `now` in,
//! and the dashboard obtains it from an injected [`Clock`].

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ── Countdown ──

/// Time left until an SLA deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    Expired,
    Left { hours: i64, minutes: i64 },
}

impl TimeRemaining {
    /// Whole hours left, floored and never negative.
    pub fn hours_left(&self) -> i64 {
        match self {
            Self::Expired => 0,
            Self::Left { hours, .. } => *hours,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("Expired"),
            Self::Left { hours, minutes } if *hours > 0 => write!(f, "{hours}h {minutes:02}m"),
            Self::Left { minutes, .. } => write!(f, "{minutes}m left"),
        }
    }
}

/// Advisory countdown to `deadline`. Never changes any field state.
pub fn time_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let diff = deadline - now;
    if diff <= Duration::zero() {
        return TimeRemaining::Expired;
    }
    let hours = diff.num_hours();
    let minutes = diff.num_minutes() - hours * 60;
    TimeRemaining::Left { hours, minutes }
}

/// Whole hours to `deadline`, floored and clamped at 0.
pub fn hours_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    time_remaining(deadline, now).hours_left()
}
