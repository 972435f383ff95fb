//! Interval specifications and the clock jobs are timed against

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::application::errors::ScheduleError;

/// When a job fires
#[derive(Debug, Clone)]
pub enum IntervalSpec {
    /// Recurring cron expression
    Cron(Box<cron::Schedule>),
    /// One-shot absolute instant
    At(DateTime<Utc>),
}

impl IntervalSpec {
    /// Parse an RFC 3339 instant or a cron expression with 5 (minute
    /// resolution), 6 or 7 fields
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let expr = expr.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(expr) {
            return Ok(IntervalSpec::At(at.with_timezone(&Utc)));
        }

        let invalid = |reason: String| ScheduleError::InvalidInterval {
            expr: expr.to_string(),
            reason,
        };
        let normalized = match expr.split_whitespace().count() {
            5 => format!("0 {}", expr),
            6 | 7 => expr.to_string(),
            n => return Err(invalid(format!("expected 5 to 7 fields, got {}", n))),
        };

        cron::Schedule::from_str(&normalized)
            .map(|schedule| IntervalSpec::Cron(Box::new(schedule)))
            .map_err(|e| invalid(e.to_string()))
    }

    /// First fire strictly after `after`, if any
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            IntervalSpec::Cron(schedule) => schedule.after(after).next(),
            IntervalSpec::At(at) => (at > after).then_some(*at),
        }
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(self, IntervalSpec::At(_))
    }
}

impl FromStr for IntervalSpec {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Wall clock driven by tokio's timer, so paused test time moves it too
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    wall: DateTime<Utc>,
    instant: tokio::time::Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            wall: Utc::now(),
            instant: tokio::time::Instant::now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.instant.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall + elapsed
    }

    /// Sleep until `at`; returns immediately for instants already past
    pub fn sleep_until(&self, at: DateTime<Utc>) -> tokio::time::Sleep {
        let delay = (at - self.now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(delay)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
