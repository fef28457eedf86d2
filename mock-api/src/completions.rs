//! Completion log for intercepted requests
//!
//! Every request answered by a rule is recorded as a [`Completion`]. Tests
//! wait on a rule to observe that the front end's request has been fully
//! handled before asserting on the store. Each completion satisfies exactly
//! one wait, oldest first, so `N` requests satisfy `N` sequential waits.
//!
//! A consumed completion is dropped from the log; only its count is kept.
//! Unconsumed completions stay until a wait takes them or the log is cleared
//! on reset.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Notify;

use crate::rules::RuleId;

/// A request that a rule finished handling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    /// Position in the global completion order, starting at 1
    pub sequence: u64,
    pub rule: RuleId,
    pub alias: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub completed_at: DateTime<Utc>,
}

/// Errors raised while waiting for a completion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("No rule registered under alias '{0}'")]
    UnknownAlias(String),

    #[error("Timed out after {waited_ms} ms waiting for '{alias}'")]
    Timeout { alias: String, waited_ms: u128 },
}

#[derive(Debug, Default)]
struct RuleQueue {
    pending: VecDeque<Completion>,
    recorded: usize,
}

#[derive(Debug, Default)]
struct LogState {
    next_sequence: u64,
    queues: HashMap<RuleId, RuleQueue>,
}

/// Ordered record of completed requests with awaitable per-rule cursors
#[derive(Debug, Default)]
pub struct CompletionLog {
    state: Mutex<LogState>,
    notify: Notify,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` finished handling a request and wake waiters
    pub fn record(
        &self,
        rule: RuleId,
        alias: &str,
        method: &Method,
        path: &str,
        status: StatusCode,
    ) -> Completion {
        let completion = {
            let mut state = self.state.lock();
            state.next_sequence += 1;
            let completion = Completion {
                sequence: state.next_sequence,
                rule,
                alias: alias.to_string(),
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                completed_at: Utc::now(),
            };
            let queue = state.queues.entry(rule).or_default();
            queue.pending.push_back(completion.clone());
            queue.recorded += 1;
            completion
        };

        self.notify.notify_waiters();
        completion
    }

    /// Take the next unconsumed completion of `rule`, if any
    pub fn try_next(&self, rule: RuleId) -> Option<Completion> {
        let mut state = self.state.lock();
        state.queues.get_mut(&rule)?.pending.pop_front()
    }

    /// Wait until `rule` has an unconsumed completion, or `timeout` elapses
    pub async fn wait_next(
        &self,
        rule: RuleId,
        alias: &str,
        timeout: Duration,
    ) -> Result<Completion, WaitError> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a record between the check and the
            // await still wakes us
            notified.as_mut().enable();

            if let Some(completion) = self.try_next(rule) {
                return Ok(completion);
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Err(WaitError::Timeout {
                    alias: alias.to_string(),
                    waited_ms: timeout.as_millis(),
                });
            }
        }
    }

    /// Number of completions recorded for `rule`, consumed or not
    pub fn count(&self, rule: RuleId) -> usize {
        self.state
            .lock()
            .queues
            .get(&rule)
            .map_or(0, |queue| queue.recorded)
    }

    /// Number of completions of `rule` no waiter has taken yet
    pub fn pending(&self, rule: RuleId) -> usize {
        self.state
            .lock()
            .queues
            .get(&rule)
            .map_or(0, |queue| queue.pending.len())
    }

    /// Completions no waiter has taken yet, in the order they happened
    pub fn unconsumed(&self) -> Vec<Completion> {
        let state = self.state.lock();
        let mut unconsumed: Vec<Completion> = state
            .queues
            .values()
            .flat_map(|queue| queue.pending.iter().cloned())
            .collect();
        unconsumed.sort_by_key(|completion| completion.sequence);
        unconsumed
    }

    /// Forget every completion. Sequence numbers keep increasing.
    pub fn clear(&self) {
        self.state.lock().queues.clear();
    }
}
