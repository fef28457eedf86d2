use crate::{
    error::Result,
    models::{Task, TaskSnapshot},
};

/// In-memory resource store for tasks and their nested to-dos.
///
/// Every call is atomic: it either applies its whole mutation or leaves the
/// store untouched. Implementations are not required to be internally
/// synchronized. The interceptor owns the store behind a single lock and
/// runs each intercepted call to completion before the next one, which is
/// the only concurrency model this trait supports.
pub trait ResourceStore: Send {
    /// Append a new to-do to a task
    ///
    /// # Arguments
    /// * `task_id` - The parent task
    /// * `description` - The to-do text, stored verbatim
    ///
    /// # Returns
    /// * `Ok(String)` - The freshly generated to-do id
    /// * `Err(StoreError::NotFound)` - If the task doesn't exist
    /// * `Err(StoreError::Validation)` - If the description is empty
    /// * `Err(StoreError::IdentityCollision)` - If the id generator repeated an id
    fn create_todo(&mut self, task_id: &str, description: &str) -> Result<String>;

    /// Flip the `done` flag of a to-do, searching all tasks
    ///
    /// # Returns
    /// * `Ok(Some(done))` - The new value of the flag
    /// * `Ok(None)` - No to-do has that id; nothing changed
    fn toggle_todo(&mut self, todo_id: &str) -> Result<Option<bool>>;

    /// Remove a to-do from its parent task
    ///
    /// Deleting an unknown id is a no-op.
    ///
    /// # Returns
    /// * `Ok(true)` - The to-do existed and was removed
    /// * `Ok(false)` - No to-do has that id
    fn delete_todo(&mut self, todo_id: &str) -> Result<bool>;

    /// Get a deep copy of a task and its current to-dos
    ///
    /// # Returns
    /// * `Ok(TaskSnapshot)` - The task
    /// * `Err(StoreError::NotFound)` - If the task doesn't exist
    fn get_task(&self, task_id: &str) -> Result<TaskSnapshot>;

    /// List the tasks owned by a user, in insertion order
    ///
    /// Unknown users yield an empty list.
    fn list_tasks_of_user(&self, user_id: &str) -> Result<Vec<TaskSnapshot>>;

    /// Snapshot every task in the store, in insertion order
    fn all_tasks(&self) -> Vec<TaskSnapshot>;

    /// Add a task (with its to-dos) to the store
    ///
    /// # Returns
    /// * `Err(StoreError::IdentityCollision)` - If the task id or any to-do id is already in use
    /// * `Err(StoreError::Validation)` - If an id or to-do description is empty
    fn insert_task(&mut self, task: Task) -> Result<()>;

    /// Discard all state and load a fresh seed
    fn reset(&mut self, seed: Vec<Task>) -> Result<()>;
}
