//! Integration tests for the mocks crate
//!
//! Exercises the in-memory store through the public trait, the way the
//! interceptor drives it, plus property tests over random operation
//! sequences.

use mocks::*;
use proptest::prelude::*;
use todo_core::{ResourceStore, StoreError};

fn state_bytes(store: &InMemoryTaskStore) -> Vec<u8> {
    serde_json::to_vec(&store.all_tasks()).unwrap()
}

#[test]
fn test_in_memory_store_passes_contract() {
    let mut store = InMemoryTaskStore::new();
    test_store_contract(&mut store);
}

#[test]
fn test_timestamp_ids_pass_contract() {
    let mut store = InMemoryTaskStore::with_id_generator(IdStrategy::Timestamp.generator());
    test_store_contract(&mut store);
}

#[test]
fn test_scenario_create_appends_after_seed() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    store.create_todo(STUB_TASK_ID, "A").unwrap();

    let task = store.get_task(STUB_TASK_ID).unwrap();
    assert_todo_descriptions(&task, &["initial todo", "A"]);
    assert!(task.todos.iter().all(|t| !t.done));
}

#[test]
fn test_scenario_long_description_verbatim() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    let description = "x".repeat(200);
    let id = store.create_todo(STUB_TASK_ID, &description).unwrap();

    let task = store.get_task(STUB_TASK_ID).unwrap();
    assert_todo_matches(
        &task,
        &id,
        &TodoMatcher::new().with_description(description).with_done(false),
    );
}

#[test]
fn test_scenario_toggle_twice_restores_state() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    let id = store.create_todo(STUB_TASK_ID, "toggle-me").unwrap();

    store.toggle_todo(&id).unwrap();
    assert_todo_done(&store.get_task(STUB_TASK_ID).unwrap(), &id, true);

    store.toggle_todo(&id).unwrap();
    assert_todo_done(&store.get_task(STUB_TASK_ID).unwrap(), &id, false);
}

#[test]
fn test_scenario_delete_only_todo() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    store.delete_todo(STUB_TODO_ID).unwrap();

    let task = store.get_task(STUB_TASK_ID).unwrap();
    assert!(task.todos.is_empty());
}

#[test]
fn test_delete_unknown_leaves_bytes_unchanged() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    store.create_todo(STUB_TASK_ID, "keep").unwrap();
    let before = state_bytes(&store);

    store.delete_todo("stub_does_not_exist").unwrap();

    assert_eq!(state_bytes(&store), before);
}

#[test]
fn test_reserved_characters_are_stored_verbatim() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    let description = generate_reserved_description();
    let id = store.create_todo(STUB_TASK_ID, &description).unwrap();

    let task = store.get_task(STUB_TASK_ID).unwrap();
    assert_eq!(task.todo(&id).unwrap().description, description);
}

#[test]
fn test_multiple_tasks_keep_todos_separate() {
    let mut store = InMemoryTaskStore::with_tasks(create_test_tasks(3, 2)).unwrap();

    store.create_todo("task_2", "only in task 2").unwrap();
    store.delete_todo("task_1_todo_1").unwrap();

    assert_eq!(store.get_task("task_1").unwrap().todos.len(), 1);
    assert_eq!(store.get_task("task_2").unwrap().todos.len(), 3);
    assert_eq!(store.get_task("task_3").unwrap().todos.len(), 2);
    assert_ids_unique(&store.all_tasks());
}

#[test]
fn test_list_tasks_of_user_preserves_insertion_order() {
    let store = InMemoryTaskStore::with_tasks(create_test_tasks(5, 0)).unwrap();

    // Tasks 1, 3 and 5 belong to user-2
    let ids: Vec<_> = store
        .list_tasks_of_user("user-2")
        .unwrap()
        .iter()
        .map(|t| t.task_id().to_string())
        .collect();
    assert_eq!(ids, vec!["task_1", "task_3", "task_5"]);
}

#[test]
fn test_builders_seed_a_store() {
    let task = TaskBuilder::new()
        .with_id("built")
        .with_title("Built task")
        .with_owner("builder")
        .with_todo(TodoBuilder::new().with_id("d1").with_description("done one").done(true).build())
        .with_todo(TodoBuilder::new().with_id("d2").with_description("open one").build())
        .build();
    let store = InMemoryTaskStore::with_tasks(vec![task]).unwrap();

    let snapshot = store.get_task("built").unwrap();
    assert_todo_done(&snapshot, "d1", true);
    assert_todo_done(&snapshot, "d2", false);
    assert_eq!(store.list_tasks_of_user("builder").unwrap().len(), 1);
}

#[test]
fn test_generated_tasks_load_without_collisions() {
    let generator = TaskGenerator::new();
    let tasks: Vec<_> = (0..10).map(|n| generator.generate(n)).collect();
    let store = InMemoryTaskStore::with_tasks(tasks).unwrap();
    assert_eq!(store.task_count(), 10);
    assert_ids_unique(&store.all_tasks());
}

#[test]
fn test_error_injection_does_not_mutate() {
    let mut store = InMemoryTaskStore::seeded().unwrap();
    store.inject_error(StoreError::Injected("disk on fire".into()));
    let before = state_bytes(&store);

    let result = store.create_todo(STUB_TASK_ID, "never stored");
    assert!(matches!(result, Err(StoreError::Injected(_))));
    assert_eq!(state_bytes(&store), before);
}

proptest! {
    #[test]
    fn prop_random_operations_keep_invariants(ops in store_ops_strategy(40)) {
        let mut store = InMemoryTaskStore::seeded().unwrap();
        let mut created = Vec::new();

        for op in ops {
            let ids: Vec<String> = store
                .get_task(STUB_TASK_ID)
                .unwrap()
                .todos
                .iter()
                .map(|t| t.id.as_str().to_string())
                .collect();

            match op {
                StoreOp::Create(description) => {
                    let id = store.create_todo(STUB_TASK_ID, &description).unwrap();
                    prop_assert!(!created.contains(&id));
                    created.push(id.clone());

                    let task = store.get_task(STUB_TASK_ID).unwrap();
                    let last = task.todos.last().unwrap();
                    prop_assert_eq!(last.id.as_str(), id.as_str());
                    prop_assert_eq!(&last.description, &description);
                    prop_assert!(!last.done);
                }
                StoreOp::Toggle(index) if !ids.is_empty() => {
                    let id = &ids[index % ids.len()];
                    let before = store.get_task(STUB_TASK_ID).unwrap().todo(id).unwrap().done;
                    prop_assert_eq!(store.toggle_todo(id).unwrap(), Some(!before));
                }
                StoreOp::Delete(index) if !ids.is_empty() => {
                    let id = &ids[index % ids.len()];
                    prop_assert!(store.delete_todo(id).unwrap());
                    let after_once = state_bytes(&store);
                    prop_assert!(!store.delete_todo(id).unwrap());
                    prop_assert_eq!(state_bytes(&store), after_once);
                }
                StoreOp::Toggle(_) | StoreOp::Delete(_) => {}
                StoreOp::ToggleUnknown => {
                    let before = state_bytes(&store);
                    prop_assert_eq!(store.toggle_todo("never-issued").unwrap(), None);
                    prop_assert_eq!(state_bytes(&store), before);
                }
                StoreOp::DeleteUnknown => {
                    let before = state_bytes(&store);
                    prop_assert!(!store.delete_todo("never-issued").unwrap());
                    prop_assert_eq!(state_bytes(&store), before);
                }
            }
        }

        assert_ids_unique(&store.all_tasks());
    }

    #[test]
    fn prop_toggle_is_involutive(description in description_strategy()) {
        let mut store = InMemoryTaskStore::seeded().unwrap();
        let id = store.create_todo(STUB_TASK_ID, &description).unwrap();
        let before = state_bytes(&store);

        store.toggle_todo(&id).unwrap();
        store.toggle_todo(&id).unwrap();

        prop_assert_eq!(state_bytes(&store), before);
    }
}
