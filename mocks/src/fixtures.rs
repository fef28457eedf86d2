//! Seed data and standard test fixtures
//!
//! The seed functions are pure: every call builds a fresh value, so each
//! test can prime its own store without sharing state with another.

use todo_core::{Task, Todo};

/// Id of the seeded task
pub const STUB_TASK_ID: &str = "stub_task_1";

/// Id of the seeded to-do
pub const STUB_TODO_ID: &str = "stub_todo_1";

/// User id the fixtures and tests list tasks for
pub const STUB_USER_ID: &str = "stub_user_1";

/// Title of the seeded task, as rendered on the dashboard
pub const STUB_TASK_TITLE: &str = "GUI-test task";

/// Description of the seeded to-do
pub const STUB_TODO_DESCRIPTION: &str = "initial todo";

/// The seeded task: one task holding one not-yet-done to-do
///
/// It has no owner, so the `ofuser` listing returns it for any user id.
/// The application under test creates its users at runtime and the seed
/// cannot know their ids in advance.
pub fn seed_task() -> Task {
    let mut task = Task::new(
        STUB_TASK_ID,
        STUB_TASK_TITLE,
        "Task created by Cypress (stub)",
        "dQw4w9WgXcQ",
        None,
    );
    task.todos.push(Todo::new(STUB_TODO_ID, STUB_TODO_DESCRIPTION));
    task
}

/// Seed listed only for the given user
pub fn seed_task_for_user(user_id: &str) -> Task {
    let mut task = seed_task();
    task.owner = Some(user_id.to_string());
    task
}

/// The full initial resource graph
pub fn seed_tasks() -> Vec<Task> {
    vec![seed_task()]
}

/// Create a basic test task with sensible defaults and no to-dos
pub fn create_test_task(id: &str) -> Task {
    Task::new(
        id,
        format!("Test Task {id}"),
        "A standard test task with default values",
        "video-key",
        Some("test-user".to_string()),
    )
}

/// Create multiple unique tasks, each with `todos_per_task` to-dos
pub fn create_test_tasks(count: usize, todos_per_task: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            let mut task = create_test_task(&format!("task_{i}"));
            // Distribute across 2 users
            task.owner = Some(format!("user-{}", i % 2 + 1));
            task.todos = (1..=todos_per_task)
                .map(|j| Todo::new(format!("task_{i}_todo_{j}"), format!("todo {j} of task {i}")))
                .collect();
            task
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let task = seed_task();
        assert_eq!(task.id, STUB_TASK_ID);
        assert_eq!(task.title, STUB_TASK_TITLE);
        assert_eq!(task.video.url, "dQw4w9WgXcQ");
        assert_eq!(task.todos, vec![Todo::new(STUB_TODO_ID, STUB_TODO_DESCRIPTION)]);
        assert!(!task.todos[0].done);
    }

    #[test]
    fn test_seed_is_fresh_every_call() {
        let mut first = seed_task();
        first.todos.clear();
        assert_eq!(seed_task().todos.len(), 1);
    }

    #[test]
    fn test_create_test_tasks_ids_are_unique() {
        let tasks = create_test_tasks(3, 2);
        let mut ids: Vec<_> = tasks
            .iter()
            .flat_map(|t| std::iter::once(t.id.clone()).chain(t.todos.iter().map(|d| d.id.clone())))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 9);
    }

    #[test]
    fn test_seed_for_user() {
        let task = seed_task_for_user("u-9");
        assert!(task.is_owned_by("u-9"));
        assert!(!task.is_owned_by(STUB_USER_ID));
    }

    #[test]
    fn test_default_seed_is_listed_for_any_user() {
        let task = seed_task();
        assert_eq!(task.owner, None);
        assert!(task.is_owned_by(STUB_USER_ID));
        assert!(task.is_owned_by("6650f1c2a1b2c3d4e5f60718"));
    }
}
