//! To-Do Core Library
//!
//! Domain models, error types and the store trait shared by the mock backend
//! crates.
//!
//! # Architecture
//!
//! - [`models`] - Tasks, nested to-dos and their wire-shaped snapshots
//! - [`error`] - Error types and result handling
//! - [`repository`] - The [`ResourceStore`] trait
//! - [`validation`] - Checks applied before anything is persisted
//!
//! # Example
//!
//! ```rust
//! use todo_core::{models::Task, validation::TodoValidator};
//!
//! let task = Task::new("stub_task_1", "GUI-test task", "A task", "dQw4w9WgXcQ", None);
//! TodoValidator::validate_task(&task).unwrap();
//! assert!(task.snapshot().todos.is_empty());
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use error::{Result, StoreError};
pub use models::{ObjectId, Task, TaskSnapshot, Todo, TodoSnapshot, Video};
pub use repository::ResourceStore;
pub use validation::TodoValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
