//! Mock Server Library
//!
//! Configuration, logging and wiring for the to-do mock backend binary:
//! the in-memory store, its seed, the interceptor and the HTTP server.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::Config;
pub use setup::{create_seed_provider, create_server, create_store, initialize_app};
pub use telemetry::init_telemetry;
