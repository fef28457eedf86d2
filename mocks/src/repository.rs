//! In-memory implementation of the ResourceStore trait
//!
//! Provides the authoritative state behind the mock backend with:
//! - Deterministic, never-reused id generation
//! - Error injection for failure testing
//! - Call tracking for verification

use std::collections::HashSet;

use parking_lot::Mutex;
use todo_core::{
    ResourceStore, Result, StoreError, Task, TaskSnapshot, Todo, TodoValidator,
};
use tracing::{debug, error};

use crate::fixtures::seed_tasks;
use crate::identity::{IdGenerator, SequentialIds};

/// In-memory store of tasks and nested to-dos
///
/// Features:
/// - Insertion-ordered tasks and to-dos
/// - Every id ever handed out is remembered, so deleted ids are never reused
/// - Error injection for failure testing
/// - Call history tracking for verification
pub struct InMemoryTaskStore {
    tasks: Vec<Task>,
    issued_ids: HashSet<String>,
    id_generator: Box<dyn IdGenerator>,
    error_injection: Mutex<Option<StoreError>>,
    call_history: Mutex<Vec<String>>,
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("tasks", &self.tasks)
            .field("issued_ids", &self.issued_ids.len())
            .finish()
    }
}

impl InMemoryTaskStore {
    /// Create a new empty store with sequential ids
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(SequentialIds::default()))
    }

    /// Create an empty store using a specific id generator
    pub fn with_id_generator(id_generator: Box<dyn IdGenerator>) -> Self {
        Self {
            tasks: Vec::new(),
            issued_ids: HashSet::new(),
            id_generator,
            error_injection: Mutex::new(None),
            call_history: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Result<Self> {
        let mut store = Self::new();
        store.load(tasks)?;
        Ok(store)
    }

    /// Create a store holding the standard seed (one task, one to-do)
    pub fn seeded() -> Result<Self> {
        Self::with_tasks(seed_tasks())
    }

    /// Replace the id generator, keeping current state
    pub fn set_id_generator(&mut self, id_generator: Box<dyn IdGenerator>) {
        self.id_generator = id_generator;
    }

    /// Number of tasks currently held
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of to-dos across all tasks
    pub fn todo_count(&self) -> usize {
        self.tasks.iter().map(|t| t.todos.len()).sum()
    }

    /// Id of the only task in the store, if there is exactly one
    pub fn sole_task_id(&self) -> Option<&str> {
        match self.tasks.as_slice() {
            [task] => Some(task.id.as_str()),
            _ => None,
        }
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: StoreError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.contains(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Check if an error should be injected, consuming it if so
    fn check_error_injection(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().take() {
            return Err(error);
        }
        Ok(())
    }

    fn record_call(&self, method: &str) {
        self.call_history.lock().push(format!("{method}()"));
    }

    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }

    fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Replace all state with `tasks`, or change nothing on error
    fn load(&mut self, tasks: Vec<Task>) -> Result<()> {
        let mut issued = HashSet::new();
        for task in &tasks {
            claim_ids(&mut issued, task)?;
        }
        self.tasks = tasks;
        self.issued_ids = issued;
        Ok(())
    }
}

/// Reserve every id of `task`, failing without side effects on any repeat
fn claim_ids(issued: &mut HashSet<String>, task: &Task) -> Result<()> {
    TodoValidator::validate_task(task)?;

    let mut fresh = HashSet::new();
    for id in std::iter::once(&task.id).chain(task.todos.iter().map(|t| &t.id)) {
        if issued.contains(id) || !fresh.insert(id.clone()) {
            return Err(StoreError::IdentityCollision(id.clone()));
        }
    }
    issued.extend(fresh);
    Ok(())
}

impl ResourceStore for InMemoryTaskStore {
    fn create_todo(&mut self, task_id: &str, description: &str) -> Result<String> {
        self.record_call_with_params("create_todo", &format!("task_id={task_id}"));

        self.check_error_injection()?;

        let index = self
            .task_index(task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))?;
        TodoValidator::validate_description(description)?;

        let id = self.id_generator.next_id();
        TodoValidator::validate_id("todo id", &id)?;
        if !self.issued_ids.insert(id.clone()) {
            error!(id = %id, "Id generator produced an id that is already in use");
            return Err(StoreError::IdentityCollision(id));
        }

        self.tasks[index].todos.push(Todo::new(id.clone(), description));
        debug!(task_id, todo_id = %id, "Created todo");

        Ok(id)
    }

    fn toggle_todo(&mut self, todo_id: &str) -> Result<Option<bool>> {
        self.record_call_with_params("toggle_todo", &format!("id={todo_id}"));

        self.check_error_injection()?;

        let done = self
            .tasks
            .iter_mut()
            .find_map(|task| task.todo_mut(todo_id))
            .map(Todo::toggle);

        match done {
            Some(done) => debug!(todo_id, done, "Toggled todo"),
            None => debug!(todo_id, "Toggle of unknown todo ignored"),
        }

        Ok(done)
    }

    fn delete_todo(&mut self, todo_id: &str) -> Result<bool> {
        self.record_call_with_params("delete_todo", &format!("id={todo_id}"));

        self.check_error_injection()?;

        for task in &mut self.tasks {
            if let Some(position) = task.todos.iter().position(|t| t.id == todo_id) {
                task.todos.remove(position);
                debug!(todo_id, task_id = %task.id, "Deleted todo");
                return Ok(true);
            }
        }

        debug!(todo_id, "Delete of unknown todo ignored");
        Ok(false)
    }

    fn get_task(&self, task_id: &str) -> Result<TaskSnapshot> {
        self.record_call_with_params("get_task", &format!("id={task_id}"));

        self.check_error_injection()?;

        self.tasks
            .iter()
            .find(|t| t.id == task_id)
            .map(Task::snapshot)
            .ok_or_else(|| StoreError::task_not_found(task_id))
    }

    fn list_tasks_of_user(&self, user_id: &str) -> Result<Vec<TaskSnapshot>> {
        self.record_call_with_params("list_tasks_of_user", &format!("user_id={user_id}"));

        self.check_error_injection()?;

        Ok(self
            .tasks
            .iter()
            .filter(|t| t.is_owned_by(user_id))
            .map(Task::snapshot)
            .collect())
    }

    fn all_tasks(&self) -> Vec<TaskSnapshot> {
        self.tasks.iter().map(Task::snapshot).collect()
    }

    fn insert_task(&mut self, task: Task) -> Result<()> {
        self.record_call_with_params("insert_task", &format!("id={}", task.id));

        claim_ids(&mut self.issued_ids, &task)?;
        self.tasks.push(task);
        Ok(())
    }

    fn reset(&mut self, seed: Vec<Task>) -> Result<()> {
        self.record_call("reset");

        self.load(seed)?;
        self.clear_error();
        debug!(tasks = self.tasks.len(), "Store reset");
        Ok(())
    }
}
