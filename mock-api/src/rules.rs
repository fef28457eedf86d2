//! Interception rules
//!
//! A rule binds an HTTP method and a [`UrlPattern`] to a handler and an
//! alias. When several rules match a request the most specific pattern
//! wins; ties go to the rule registered first.

use std::fmt;

use axum::http::Method;
use serde::Serialize;
use thiserror::Error;

use crate::error::ApiError;
use crate::pattern::{PatternError, RouteMatch, UrlPattern};
use crate::request::{InterceptedRequest, MockResponse};

/// Result returned by a rule handler
pub type HandlerResult = Result<MockResponse, ApiError>;

/// Stable identifier of a registered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RuleId(pub usize);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Errors raised while registering rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Alias '{0}' is already registered")]
    DuplicateAlias(String),

    #[error("Alias cannot be empty")]
    EmptyAlias,
}

/// Handles a request matched by a rule, with exclusive access to the store
pub trait Handler<S>: Send + Sync {
    fn handle(&self, store: &mut S, request: &InterceptedRequest, route: &RouteMatch) -> HandlerResult;
}

impl<S, F> Handler<S> for F
where
    F: Fn(&mut S, &InterceptedRequest, &RouteMatch) -> HandlerResult + Send + Sync,
{
    fn handle(&self, store: &mut S, request: &InterceptedRequest, route: &RouteMatch) -> HandlerResult {
        self(store, request, route)
    }
}

/// A registered rule
pub struct Rule<S> {
    pub id: RuleId,
    pub alias: String,
    pub method: Method,
    pub pattern: UrlPattern,
    handler: Box<dyn Handler<S>>,
}

impl<S> Rule<S> {
    pub fn handle(&self, store: &mut S, request: &InterceptedRequest, route: &RouteMatch) -> HandlerResult {
        self.handler.handle(store, request, route)
    }
}

impl<S> fmt::Debug for Rule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("alias", &self.alias)
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Ordered collection of rules
pub struct RuleTable<S> {
    rules: Vec<Rule<S>>,
}

impl<S> Default for RuleTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for RuleTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl<S> RuleTable<S> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. Aliases must be unique.
    pub fn register<H>(
        &mut self,
        method: Method,
        pattern: &str,
        alias: &str,
        handler: H,
    ) -> Result<RuleId, RuleError>
    where
        H: Handler<S> + 'static,
    {
        if alias.is_empty() {
            return Err(RuleError::EmptyAlias);
        }
        if self.by_alias(alias).is_some() {
            return Err(RuleError::DuplicateAlias(alias.to_string()));
        }
        let pattern = UrlPattern::parse(pattern)?;

        let id = RuleId(self.rules.len());
        self.rules.push(Rule {
            id,
            alias: alias.to_string(),
            method,
            pattern,
            handler: Box::new(handler),
        });
        Ok(id)
    }

    /// Most specific rule matching `method` and `path`
    pub fn find(&self, method: &Method, path: &str) -> Option<(&Rule<S>, RouteMatch)> {
        let mut best: Option<(&Rule<S>, RouteMatch)> = None;

        for rule in self.rules.iter().filter(|rule| rule.method == *method) {
            let Some(route) = rule.pattern.matches(path) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => rule.pattern.specificity() > current.pattern.specificity(),
            };
            if better {
                best = Some((rule, route));
            }
        }

        best
    }

    pub fn by_alias(&self, alias: &str) -> Option<RuleId> {
        self.rules
            .iter()
            .find(|rule| rule.alias == alias)
            .map(|rule| rule.id)
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule<S>> {
        self.rules.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<S>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
