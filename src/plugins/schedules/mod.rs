//! Built-in schedules

pub mod heartbeat;
