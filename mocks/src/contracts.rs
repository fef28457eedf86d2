//! Contract test helpers for validating ResourceStore implementations
//!
//! Provides standardized checks that any implementation of the store trait
//! should pass. Each check expects a store freshly primed with
//! [`seed_tasks`](crate::fixtures::seed_tasks).

use todo_core::{ResourceStore, StoreError, Task};

use crate::assertions::{assert_ids_unique, assert_todo_absent, assert_todo_descriptions};
use crate::fixtures::{seed_tasks, STUB_TASK_ID, STUB_TODO_DESCRIPTION, STUB_TODO_ID, STUB_USER_ID};

/// Run the full contract suite, resetting the store before each check
pub fn test_store_contract<S: ResourceStore>(store: &mut S) {
    let checks: [fn(&mut S); 7] = [
        test_create_contract::<S>,
        test_toggle_contract::<S>,
        test_delete_contract::<S>,
        test_get_contract::<S>,
        test_list_contract::<S>,
        test_identity_contract::<S>,
        test_reset_contract::<S>,
    ];

    for check in checks {
        store.reset(seed_tasks()).expect("Reset should succeed");
        check(store);
    }
}

/// Test to-do creation contract
pub fn test_create_contract<S: ResourceStore>(store: &mut S) {
    let id = store
        .create_todo(STUB_TASK_ID, "A")
        .expect("Create should succeed");

    let task = store.get_task(STUB_TASK_ID).expect("Seeded task should exist");
    assert_todo_descriptions(&task, &[STUB_TODO_DESCRIPTION, "A"]);
    let created = task.todo(&id).expect("Created to-do should be present");
    assert!(!created.done, "New to-do should start not done");

    let long = "x".repeat(200);
    store
        .create_todo(STUB_TASK_ID, &long)
        .expect("Long description should be accepted");
    let task = store.get_task(STUB_TASK_ID).expect("Seeded task should exist");
    assert_eq!(
        task.todos.last().map(|t| t.description.as_str()),
        Some(long.as_str()),
        "Long description should be stored verbatim"
    );

    match store.create_todo("no-such-task", "x") {
        Err(StoreError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {other:?}"),
    }

    match store.create_todo(STUB_TASK_ID, "") {
        Err(StoreError::Validation(_)) => {}
        other => panic!("Expected Validation error, got: {other:?}"),
    }
}

/// Test toggle contract
pub fn test_toggle_contract<S: ResourceStore>(store: &mut S) {
    let before = store.get_task(STUB_TASK_ID).expect("Seeded task should exist");
    let initial = before.todos[0].done;

    assert_eq!(
        store.toggle_todo(STUB_TODO_ID).expect("Toggle should succeed"),
        Some(!initial)
    );
    assert_eq!(
        store.toggle_todo(STUB_TODO_ID).expect("Toggle should succeed"),
        Some(initial),
        "Toggle should be its own inverse"
    );

    let unchanged = store.all_tasks();
    assert_eq!(
        store.toggle_todo("no-such-todo").expect("Unknown toggle is a no-op"),
        None
    );
    assert_eq!(store.all_tasks(), unchanged);
}

/// Test delete contract
pub fn test_delete_contract<S: ResourceStore>(store: &mut S) {
    let unchanged = store.all_tasks();
    assert!(!store.delete_todo("no-such-todo").expect("Unknown delete is a no-op"));
    assert_eq!(store.all_tasks(), unchanged);

    assert!(store.delete_todo(STUB_TODO_ID).expect("Delete should succeed"));
    let after_once = store.all_tasks();
    assert!(!store.delete_todo(STUB_TODO_ID).expect("Second delete is a no-op"));
    assert_eq!(store.all_tasks(), after_once, "Delete should be idempotent");

    let task = store
        .get_task(STUB_TASK_ID)
        .expect("Task with no to-dos should still be readable");
    assert!(task.todos.is_empty());
    assert_todo_absent(&task, STUB_TODO_ID);
}

/// Test get contract
pub fn test_get_contract<S: ResourceStore>(store: &mut S) {
    let mut task = store.get_task(STUB_TASK_ID).expect("Get should succeed");
    assert_eq!(task.task_id(), STUB_TASK_ID);

    // Mutating a snapshot must not reach the store
    task.todos.clear();
    let again = store.get_task(STUB_TASK_ID).expect("Get should succeed");
    assert_eq!(again.todos.len(), 1, "Snapshots should be detached copies");

    match store.get_task("no-such-task") {
        Err(StoreError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}

/// Test list contract
pub fn test_list_contract<S: ResourceStore>(store: &mut S) {
    let tasks = store
        .list_tasks_of_user(STUB_USER_ID)
        .expect("List should succeed");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_id(), STUB_TASK_ID);

    // The seed has no owner, so users unknown to the store still see it
    let any = store
        .list_tasks_of_user("no-such-user")
        .expect("List should succeed for unknown users");
    assert_eq!(any.len(), 1);
    assert_eq!(any[0].task_id(), STUB_TASK_ID);

    store
        .insert_task(Task::new("owned", "Owned", "d", "v", Some("owner-1".to_string())))
        .expect("Insert should succeed");
    let owned = store
        .list_tasks_of_user("owner-1")
        .expect("List should succeed");
    assert_eq!(owned.len(), 2);
    let others = store
        .list_tasks_of_user(STUB_USER_ID)
        .expect("List should succeed");
    assert_eq!(others.len(), 1);
}

/// Test id uniqueness contract
pub fn test_identity_contract<S: ResourceStore>(store: &mut S) {
    let mut ids = Vec::new();
    for i in 0..50 {
        ids.push(
            store
                .create_todo(STUB_TASK_ID, &format!("todo {i}"))
                .expect("Create should succeed"),
        );
    }
    // Freeing ids must not make them available again
    for id in ids.iter().take(10) {
        store.delete_todo(id).expect("Delete should succeed");
    }
    for i in 0..10 {
        ids.push(
            store
                .create_todo(STUB_TASK_ID, &format!("again {i}"))
                .expect("Create should succeed"),
        );
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "Generated ids should never repeat");
    assert_ids_unique(&store.all_tasks());
}

/// Test reset contract
pub fn test_reset_contract<S: ResourceStore>(store: &mut S) {
    store
        .create_todo(STUB_TASK_ID, "temporary")
        .expect("Create should succeed");
    store.reset(seed_tasks()).expect("Reset should succeed");

    let task = store.get_task(STUB_TASK_ID).expect("Seeded task should exist");
    assert_todo_descriptions(&task, &[STUB_TODO_DESCRIPTION]);

    match store.reset([seed_tasks(), seed_tasks()].concat()) {
        Err(StoreError::IdentityCollision(_)) => {}
        other => panic!("Expected IdentityCollision error, got: {other:?}"),
    }
}
