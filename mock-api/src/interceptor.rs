//! Request interceptor
//!
//! Owns the store and the rule table. Each dispatch takes the store lock for
//! the whole of matching, handling and completion recording, so requests are
//! applied one at a time and a waiter woken by a completion always observes
//! the mutation that produced it.

use std::time::Duration;

use axum::http::Method;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use todo_core::{ResourceStore, StoreError, Task, TaskSnapshot};

use crate::completions::{Completion, CompletionLog, WaitError};
use crate::pattern::RouteMatch;
use crate::request::{InterceptedRequest, MockResponse, Outcome};
use crate::rules::{Handler, HandlerResult, RuleError, RuleId, RuleTable};

/// Intercepts requests, applies them to the store and records completions
pub struct Interceptor<S> {
    store: Mutex<S>,
    rules: RuleTable<S>,
    completions: CompletionLog,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Interceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("store", &self.store)
            .field("rules", &self.rules)
            .finish()
    }
}

impl<S: ResourceStore + 'static> Interceptor<S> {
    /// Create an interceptor with no rules
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            rules: RuleTable::new(),
            completions: CompletionLog::new(),
        }
    }

    /// Register a closure rule
    pub fn register<F>(
        &mut self,
        method: Method,
        pattern: &str,
        alias: &str,
        handler: F,
    ) -> Result<RuleId, RuleError>
    where
        F: Fn(&mut S, &InterceptedRequest, &RouteMatch) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(method, pattern, alias, handler)
    }

    /// Register any [`Handler`] implementation
    pub fn register_handler<H>(
        &mut self,
        method: Method,
        pattern: &str,
        alias: &str,
        handler: H,
    ) -> Result<RuleId, RuleError>
    where
        H: Handler<S> + 'static,
    {
        let id = self.rules.register(method.clone(), pattern, alias, handler)?;
        debug!(rule = %id, %method, pattern, alias, "Registered interception rule");
        Ok(id)
    }

    pub fn rule_id(&self, alias: &str) -> Option<RuleId> {
        self.rules.by_alias(alias)
    }

    pub fn rules(&self) -> &RuleTable<S> {
        &self.rules
    }

    /// Route a request to the most specific matching rule.
    ///
    /// Handler errors become error responses; nothing here panics or
    /// propagates to the caller.
    pub fn dispatch(&self, request: &InterceptedRequest) -> Outcome {
        let Some((rule, route)) = self.rules.find(&request.method, &request.path) else {
            debug!(method = %request.method, path = %request.path, "No rule matched, passing through");
            return Outcome::PassThrough;
        };

        let mut store = self.store.lock();

        let response = match rule.handle(&mut store, request, &route) {
            Ok(response) => response,
            Err(err) if err.is_fatal() => {
                error!(alias = %rule.alias, path = %request.path, error = %err, "Store invariant violated");
                MockResponse::from_error(&err)
            }
            Err(err) => {
                warn!(alias = %rule.alias, path = %request.path, error = %err, "Rule handler failed");
                MockResponse::from_error(&err)
            }
        };

        let completion = self.completions.record(
            rule.id,
            &rule.alias,
            &request.method,
            &request.path,
            response.status,
        );
        drop(store);

        debug!(
            alias = %completion.alias,
            sequence = completion.sequence,
            status = completion.status,
            "Request intercepted"
        );

        Outcome::Reply {
            rule: rule.id,
            response,
        }
    }

    /// Wait for the next completion of the rule registered under `alias`
    pub async fn wait_next(&self, alias: &str, timeout: Duration) -> Result<Completion, WaitError> {
        let rule = self
            .rule_id(alias)
            .ok_or_else(|| WaitError::UnknownAlias(alias.to_string()))?;
        self.completions.wait_next(rule, alias, timeout).await
    }

    pub fn completions(&self) -> &CompletionLog {
        &self.completions
    }

    /// Run `f` with exclusive access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.store.lock())
    }

    /// Snapshot of every task in insertion order
    pub fn snapshot(&self) -> Vec<TaskSnapshot> {
        self.store.lock().all_tasks()
    }

    /// Replace the store contents with `seed` and forget all completions
    pub fn reset(&self, seed: Vec<Task>) -> Result<(), StoreError> {
        let mut store = self.store.lock();
        store.reset(seed)?;
        self.completions.clear();
        Ok(())
    }
}
