use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for the mock resource store.
///
/// Each variant maps to the HTTP status a real backend would answer with, so
/// the interceptor can turn any store failure into a synthesized response
/// instead of crashing.
///
/// # Examples
///
/// ```rust
/// use todo_core::error::StoreError;
///
/// let missing = StoreError::task_not_found("stub_task_1");
/// assert!(missing.is_not_found());
/// assert_eq!(missing.status_code(), 404);
///
/// let collision = StoreError::IdentityCollision("todo-1".to_string());
/// assert!(collision.is_fatal());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Operation referenced an id absent from the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// A value was rejected before being persisted
    #[error("Validation error: {0}")]
    Validation(String),

    /// The id generator produced an id that is already in use
    #[error("Identity collision: id '{0}' is already in use")]
    IdentityCollision(String),

    /// Failure injected by a test
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    /// Create a not found error for a task id
    pub fn task_not_found(id: &str) -> Self {
        Self::NotFound(format!("Task with id '{id}' not found"))
    }

    /// Create a not found error for a to-do id
    pub fn todo_not_found(id: &str) -> Self {
        Self::NotFound(format!("Todo with id '{id}' not found"))
    }

    /// Create a validation error for an empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    /// A broken invariant that must abort test setup
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::IdentityCollision(_))
    }

    /// Convert to the HTTP status code the backend would answer with
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Decode(_) => 400,
            StoreError::Validation(_) => 400,
            StoreError::IdentityCollision(_) => 500,
            StoreError::Injected(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = StoreError::task_not_found("t1");
        assert_eq!(
            error,
            StoreError::NotFound("Task with id 't1' not found".to_string())
        );
        assert!(error.is_not_found());

        let error = StoreError::empty_field("description");
        assert!(error.is_validation());
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_error_display() {
        let error = StoreError::IdentityCollision("todo-3".to_string());
        assert_eq!(
            error.to_string(),
            "Identity collision: id 'todo-3' is already in use"
        );

        let error = StoreError::Decode("body is not valid UTF-8".to_string());
        assert_eq!(error.to_string(), "Decode error: body is not valid UTF-8");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::todo_not_found("x").status_code(), 404);
        assert_eq!(StoreError::Decode("x".into()).status_code(), 400);
        assert_eq!(StoreError::IdentityCollision("x".into()).status_code(), 500);
        assert_eq!(StoreError::Injected("x".into()).status_code(), 500);
    }

    #[test]
    fn test_only_collisions_are_fatal() {
        assert!(StoreError::IdentityCollision("x".into()).is_fatal());
        assert!(!StoreError::NotFound("x".into()).is_fatal());
        assert!(!StoreError::Injected("x".into()).is_fatal());
    }
}
