//! Id generation for records created through the store
//!
//! Two strategies are provided:
//! - [`SequentialIds`]: `todo-1`, `todo-2`, ... fully deterministic
//! - [`TimestampIds`]: `stub_<millis>` like ids handed out by a browser stub,
//!   bumped forward when two ids land on the same millisecond

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Source of fresh record ids.
///
/// Generators only promise *intended* uniqueness. The store still checks
/// every generated id and reports a repeat as an identity collision.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Monotonic counter based ids
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("todo")
    }
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Start counting from a specific value
    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Millisecond timestamp based ids, strictly increasing
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    last: i64,
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        format!("stub_{}", self.last)
    }
}

/// Generator that replays a fixed list of ids, then repeats the last one.
///
/// Only useful for driving the collision path in tests.
#[derive(Debug, Clone)]
pub struct FixedIds {
    ids: Vec<String>,
    index: usize,
}

impl FixedIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            index: 0,
        }
    }
}

impl IdGenerator for FixedIds {
    fn next_id(&mut self) -> String {
        let id = self
            .ids
            .get(self.index)
            .or_else(|| self.ids.last())
            .cloned()
            .unwrap_or_default();
        self.index += 1;
        id
    }
}

/// Configurable choice of id generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Timestamp,
}

impl IdStrategy {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Sequential => Box::new(SequentialIds::default()),
            IdStrategy::Timestamp => Box::new(TimestampIds::default()),
        }
    }
}

impl std::fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdStrategy::Sequential => write!(f, "sequential"),
            IdStrategy::Timestamp => write!(f, "timestamp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "todo-1");
        assert_eq!(ids.next_id(), "todo-2");

        let mut ids = SequentialIds::starting_at("item", 40);
        assert_eq!(ids.next_id(), "item-40");
    }

    #[test]
    fn test_timestamp_ids_are_unique_within_one_millisecond() {
        let mut ids = TimestampIds::default();
        let generated: HashSet<_> = (0..1_000).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 1_000);
        assert!(generated.iter().all(|id| id.starts_with("stub_")));
    }

    #[test]
    fn test_fixed_ids_repeat_last() {
        let mut ids = FixedIds::new(["a", "b"]);
        assert_eq!(ids.next_id(), "a");
        assert_eq!(ids.next_id(), "b");
        assert_eq!(ids.next_id(), "b");
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(IdStrategy::Sequential.to_string(), "sequential");
        assert_eq!(IdStrategy::Timestamp.to_string(), "timestamp");
        assert_eq!(IdStrategy::default(), IdStrategy::Sequential);
    }
}
