//! Domain layer - Core types with no knowledge of concrete infrastructure
//!
//! This layer contains:
//! - Entities: users, messages, command descriptors, payloads
//! - Traits: abstractions for infrastructure (Platform, Datastore, Cache)

pub mod entities;
pub mod traits;
