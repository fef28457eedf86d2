//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - To-do ordering and state with clear error messages
//! - Id uniqueness across a store
//! - Partial matching of snapshots

use std::collections::HashSet;

use todo_core::{TaskSnapshot, TodoSnapshot};

/// Assert the task's to-dos have exactly these descriptions, in order
pub fn assert_todo_descriptions(task: &TaskSnapshot, expected: &[&str]) {
    assert_eq!(
        task.todo_descriptions(),
        expected,
        "To-do descriptions of task '{}' don't match",
        task.task_id()
    );
}

/// Assert a to-do exists and has the given `done` value
pub fn assert_todo_done(task: &TaskSnapshot, todo_id: &str, done: bool) {
    let todo = find_todo(task, todo_id);
    assert_eq!(
        todo.done, done,
        "Expected to-do '{todo_id}' to have done={done}, got done={}",
        todo.done
    );
}

/// Assert no to-do with the given id exists in the task
pub fn assert_todo_absent(task: &TaskSnapshot, todo_id: &str) {
    assert!(
        task.todo(todo_id).is_none(),
        "Expected to-do '{}' to be absent from task '{}', but it was found",
        todo_id,
        task.task_id()
    );
}

/// Assert that no id appears twice across tasks and their to-dos
pub fn assert_ids_unique(tasks: &[TaskSnapshot]) {
    let mut seen = HashSet::new();
    for task in tasks {
        assert!(
            seen.insert(task.task_id().to_string()),
            "Duplicate task id '{}'",
            task.task_id()
        );
        for todo in &task.todos {
            assert!(
                seen.insert(todo.id.as_str().to_string()),
                "Duplicate to-do id '{}'",
                todo.id.as_str()
            );
        }
    }
}

/// Assert a to-do matches partial criteria
pub fn assert_todo_matches(task: &TaskSnapshot, todo_id: &str, matcher: &TodoMatcher) {
    let todo = find_todo(task, todo_id);
    if let Some(ref description) = matcher.description {
        assert_eq!(
            todo.description, *description,
            "To-do description doesn't match expected"
        );
    }
    if let Some(done) = matcher.done {
        assert_eq!(todo.done, done, "To-do done flag doesn't match expected");
    }
}

fn find_todo<'a>(task: &'a TaskSnapshot, todo_id: &str) -> &'a TodoSnapshot {
    task.todo(todo_id).unwrap_or_else(|| {
        panic!(
            "Expected to find to-do '{}' in task '{}'. Available ids: {:?}",
            todo_id,
            task.task_id(),
            task.todos.iter().map(|t| t.id.as_str()).collect::<Vec<_>>()
        )
    })
}

/// Flexible to-do matcher for partial assertions
#[derive(Debug, Default)]
pub struct TodoMatcher {
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl TodoMatcher {
    /// Create a new empty matcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Match to-dos with a specific description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Match to-dos with a specific done flag
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}
