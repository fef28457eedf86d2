//! Error handling for the interceptor
//!
//! Maps store errors and transport failures to the HTTP status the mock
//! answers with and the JSON error body it sends.

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;
use todo_core::StoreError;

/// Errors produced while handling an intercepted request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity collision: {0}")]
    IdentityCollision(String),

    #[error("Store failure: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("No rule matched and no upstream is configured: {0}")]
    NoUpstream(String),
}

impl ApiError {
    /// HTTP status of the synthesized error response
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::NoUpstream(_) => StatusCode::NOT_FOUND,
            ApiError::Decode(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::IdentityCollision(_)
            | ApiError::Store(_)
            | ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Invariant violations that should be logged at error level
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::IdentityCollision(_))
    }

    /// JSON body sent back to the client
    pub fn to_json_body(&self) -> Value {
        json!({
            "ok": false,
            "error": self.to_string()
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Decode(msg) => ApiError::Decode(msg),
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::IdentityCollision(id) => ApiError::IdentityCollision(id),
            StoreError::Injected(msg) => ApiError::Store(msg),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Decode("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::IdentityCollision("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Store("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::NoUpstream("/x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::task_not_found("t1").into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("t1")));

        let err: ApiError = StoreError::IdentityCollision("todo-1".into()).into();
        assert!(err.is_fatal());

        let err: ApiError = StoreError::Injected("boom".into()).into();
        assert_eq!(err, ApiError::Store("boom".into()));
    }

    #[test]
    fn test_json_body() {
        let body = ApiError::Validation("Field 'description' cannot be empty".into()).to_json_body();
        assert_eq!(body["ok"], false);
        assert!(body["error"].as_str().unwrap().contains("description"));
    }
}
