//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - Task construction with sensible defaults
//! - To-do construction, including pre-toggled items

use todo_core::{Task, Todo};

/// Builder for constructing Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            task: Task::new(
                "task_1",
                "Test Task",
                "A test task",
                "video-key",
                Some("test-user".to_string()),
            ),
        }
    }

    /// Set task ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.task.id = id.into();
        self
    }

    /// Set task title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    /// Set task description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    /// Set video key
    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.task.video.url = url.into();
        self
    }

    /// Set owning user
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.task.owner = Some(owner.into());
        self
    }

    /// Remove owning user, listing the task for every user
    pub fn without_owner(mut self) -> Self {
        self.task.owner = None;
        self
    }

    /// Append a to-do
    pub fn with_todo(mut self, todo: Todo) -> Self {
        self.task.todos.push(todo);
        self
    }

    /// Build the final Task
    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for constructing Todo instances in tests
pub struct TodoBuilder {
    todo: Todo,
}

impl Default for TodoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            todo: Todo::new("todo_1", "Test todo"),
        }
    }

    /// Set to-do ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.todo.id = id.into();
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.todo.description = description.into();
        self
    }

    /// Override the initial `done` state
    pub fn done(mut self, done: bool) -> Self {
        self.todo.done = done;
        self
    }

    /// Build the final Todo
    pub fn build(self) -> Todo {
        self.todo
    }
}
