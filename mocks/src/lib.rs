//! In-memory store, seed data and test utilities for the mock backend
//!
//! This crate provides:
//! - The in-memory [`ResourceStore`](todo_core::ResourceStore) implementation
//! - The seed provider priming every fresh store
//! - Pluggable id generation
//! - Builders, custom assertions and data generators
//! - Property-based testing strategies
//! - Contract test helpers

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod identity;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use identity::{FixedIds, IdGenerator, IdStrategy, SequentialIds, TimestampIds};
pub use repository::InMemoryTaskStore;
