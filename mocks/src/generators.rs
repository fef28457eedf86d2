//! Random test data generators using the fake crate
//!
//! Provides realistic random data including:
//! - To-do descriptions, plain and with URL-reserved characters
//! - Tasks with a random number of to-dos
//! - Property-based testing strategies for store operation sequences

use fake::faker::lorem::en::{Paragraph, Sentence, Words};
use fake::Fake;
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use todo_core::{Task, Todo};

/// Characters with special meaning in URLs and form bodies
pub const RESERVED_CHARS: &[char] = &['&', '=', '+', '%', '#', '?', '/', ' ', ';'];

/// Generate a realistic to-do description
pub fn generate_todo_description() -> String {
    Sentence(2..8).fake()
}

/// Generate a description sprinkled with URL-reserved characters
pub fn generate_reserved_description() -> String {
    let words: Vec<String> = Words(3..6).fake();
    let mut rng = rand::thread_rng();
    words
        .into_iter()
        .map(|word| {
            let reserved = RESERVED_CHARS[rng.gen_range(0..RESERVED_CHARS.len())];
            format!("{word}{reserved}")
        })
        .collect()
}

/// Generate a realistic task description
pub fn generate_task_description() -> String {
    Paragraph(1..3).fake()
}

/// Configurable task generator
pub struct TaskGenerator {
    pub id_prefix: String,
    /// Owners to pick from. An empty pool generates unowned tasks.
    pub user_pool: Vec<String>,
    pub max_todos: usize,
}

impl Default for TaskGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGenerator {
    /// Create new generator with default settings
    pub fn new() -> Self {
        Self {
            id_prefix: "gen".to_string(),
            user_pool: vec![
                "user-1".to_string(),
                "user-2".to_string(),
                "user-3".to_string(),
            ],
            max_todos: 5,
        }
    }

    /// Generate task number `n` with this generator's settings
    ///
    /// Ids derive from `n`, so distinct `n` give non-colliding tasks.
    pub fn generate(&self, n: usize) -> Task {
        let mut rng = rand::thread_rng();
        let owner = self.user_pool.choose(&mut rng).cloned();
        let todo_count = rng.gen_range(0..=self.max_todos);

        let mut task = Task::new(
            format!("{}_task_{n}", self.id_prefix),
            Sentence(2..5).fake::<String>(),
            generate_task_description(),
            format!("video{n}"),
            owner,
        );
        task.todos = (0..todo_count)
            .map(|i| {
                let mut todo = Todo::new(
                    format!("{}_task_{n}_todo_{i}", self.id_prefix),
                    generate_todo_description(),
                );
                todo.done = rng.gen_bool(0.3);
                todo
            })
            .collect();
        task
    }
}

/// A single store mutation, used to drive property tests
#[derive(Debug, Clone)]
pub enum StoreOp {
    Create(String),
    /// Toggle the to-do at this index (modulo the current count)
    Toggle(usize),
    /// Delete the to-do at this index (modulo the current count)
    Delete(usize),
    /// Toggle or delete an id no record has
    ToggleUnknown,
    DeleteUnknown,
}

/// Proptest strategy for valid (non-empty) descriptions, reserved chars included
pub fn description_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 &=+%#?/;._-]{1,64}"
}

/// Proptest strategy for a single store operation
pub fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => description_strategy().prop_map(StoreOp::Create),
        2 => any::<usize>().prop_map(StoreOp::Toggle),
        1 => any::<usize>().prop_map(StoreOp::Delete),
        1 => Just(StoreOp::ToggleUnknown),
        1 => Just(StoreOp::DeleteUnknown),
    ]
}

/// Proptest strategy for a sequence of store operations
pub fn store_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(store_op_strategy(), 0..max_len)
}
