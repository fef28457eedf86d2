//! Request interception for the to-do mock backend
//!
//! # Overview
//!
//! The mock-api crate sits between a front end under test and its backend.
//! It provides:
//!
//! - URL patterns with `*` and `**` wildcards
//! - A rule table routing method + path to handlers with exclusive store access
//! - A completion log tests can wait on, per rule alias
//! - The default to-do routes (`install_todo_routes`)
//! - An axum server exposing the interceptor, with pass-through to a real
//!   upstream and `/__mock` control endpoints
//!
//! # Usage
//!
//! ```no_run
//! use mock_api::{install_todo_routes, Interceptor, MockServer, SeedProvider};
//! use mocks::{seed_tasks, InMemoryTaskStore};
//! use std::sync::Arc;
//!
//! async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut interceptor = Interceptor::new(InMemoryTaskStore::seeded()?);
//!     install_todo_routes(&mut interceptor)?;
//!
//!     let seed: SeedProvider = Arc::new(seed_tasks);
//!     let server = MockServer::new(Arc::new(interceptor), seed);
//!     server.serve("127.0.0.1:5000").await?;
//!     Ok(())
//! }
//! ```

pub mod completions;
pub mod error;
pub mod form;
pub mod interceptor;
pub mod pattern;
pub mod request;
pub mod request_logger;
pub mod routes;
pub mod rules;
pub mod serialization;
pub mod server;

// Re-export key types for easier usage
pub use completions::{Completion, CompletionLog, WaitError};
pub use error::ApiError;
pub use form::FormBody;
pub use interceptor::Interceptor;
pub use pattern::{PatternError, RouteMatch, Specificity, UrlPattern};
pub use request::{InterceptedRequest, MockResponse, Outcome};
pub use routes::{
    install_todo_routes, TodoRoutes, TASKS_OF_USER, TASK_BY_ID, TODO_CREATE, TODO_DELETE,
    TODO_TOGGLE,
};
pub use rules::{Handler, HandlerResult, Rule, RuleError, RuleId, RuleTable};
pub use serialization::*;
pub use server::{MockServer, SeedProvider, Upstream, CONTROL_PREFIX, DEFAULT_WAIT_TIMEOUT};

// Re-export core types for external consumers
pub use todo_core::{ResourceStore, StoreError, Task, TaskSnapshot, Todo};
