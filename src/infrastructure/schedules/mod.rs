//! Cron-driven schedules

pub mod interval;
pub mod job;
pub mod registry;

pub use interval::{Clock, IntervalSpec};
pub use job::{Job, JobBuilder, JobHandle, JobState, Schedule, ScheduleContext};
pub use registry::ScheduleRegistry;
