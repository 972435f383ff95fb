//! Built-in commands

pub mod general;
pub mod storage;
