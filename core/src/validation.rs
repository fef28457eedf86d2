use crate::{
    error::{Result, StoreError},
    models::Task,
};

/// Validation rules applied before anything is persisted
pub struct TodoValidator;

impl TodoValidator {
    /// Validate a to-do description
    ///
    /// Descriptions are free text with no upper bound. The empty string is
    /// rejected because the backend schema requires a description.
    pub fn validate_description(description: &str) -> Result<()> {
        if description.is_empty() {
            return Err(StoreError::empty_field("description"));
        }
        Ok(())
    }

    /// Validate a resource id
    ///
    /// Ids travel as a single URL path segment, so they must be non-empty and
    /// must not contain `/`.
    pub fn validate_id(field: &str, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(StoreError::empty_field(field));
        }
        if id.contains('/') {
            return Err(StoreError::Validation(format!(
                "Field '{field}' cannot contain '/': '{id}'"
            )));
        }
        Ok(())
    }

    /// Validate a whole task before insertion
    pub fn validate_task(task: &Task) -> Result<()> {
        Self::validate_id("task id", &task.id)?;
        for todo in &task.todos {
            Self::validate_id("todo id", &todo.id)?;
            Self::validate_description(&todo.description)?;
        }

        let mut seen = std::collections::HashSet::new();
        for todo in &task.todos {
            if !seen.insert(todo.id.as_str()) {
                return Err(StoreError::IdentityCollision(todo.id.clone()));
            }
        }
        Ok(())
    }
}
