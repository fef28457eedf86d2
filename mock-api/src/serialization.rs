//! Serialization utilities for mock responses
//!
//! Handles conversion between store snapshots and the JSON the front end
//! expects.

use serde_json::{json, Value};
use todo_core::TaskSnapshot;

use crate::error::ApiError;

/// Serialize a task in the shape a `GET /tasks/byid/{id}` returns
pub fn serialize_task(task: &TaskSnapshot) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(task)?)
}

/// Serialize a list of tasks
pub fn serialize_tasks(tasks: &[TaskSnapshot]) -> Result<Value, ApiError> {
    let values: Result<Vec<_>, _> = tasks.iter().map(serialize_task).collect();
    Ok(Value::Array(values?))
}

/// Acknowledgement body for mutations
pub fn ack_body() -> Value {
    json!({ "ok": true })
}
