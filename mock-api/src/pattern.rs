//! URL patterns with wildcard segments
//!
//! Patterns are written as slash separated segments:
//! - `*` matches exactly one path segment
//! - `**` matches any number of segments, including none
//! - a segment containing `*` (e.g. `todo*`) matches within one segment
//! - anything else matches literally
//!
//! `**/todos/byid/*` therefore matches `/todos/byid/42` as well as
//! `/api/v1/todos/byid/42`. The query string never takes part in matching.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling a pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("URL pattern cannot be empty")]
    Empty,

    #[error("URL pattern '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("URL pattern '{0}' uses '**' inside a segment; it must stand alone")]
    MisplacedDoubleWildcard(String),

    #[error("URL pattern '{pattern}' failed to compile: {reason}")]
    Compile { pattern: String, reason: String },
}

/// How specific a pattern is. Greater means more specific.
///
/// Compared by literal segments (more wins), then partially literal
/// segments (more wins), then `**` count (fewer wins), then `*` count
/// (fewer wins).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Specificity {
    pub literal_segments: usize,
    pub partial_segments: usize,
    pub deep_wildcards: usize,
    pub wildcards: usize,
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_segments
            .cmp(&other.literal_segments)
            .then(self.partial_segments.cmp(&other.partial_segments))
            .then(other.deep_wildcards.cmp(&self.deep_wildcards))
            .then(other.wildcards.cmp(&self.wildcards))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Values captured by the wildcards of a matched pattern, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMatch {
    captures: Vec<String>,
}

impl RouteMatch {
    /// Capture at position `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }

    /// Last capture, typically the resource id at the end of the path
    pub fn last_segment(&self) -> Option<&str> {
        self.captures.last().map(String::as_str)
    }

    pub fn captures(&self) -> &[String] {
        &self.captures
    }
}

/// A compiled URL pattern
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    regex: Regex,
    specificity: Specificity,
}

impl UrlPattern {
    /// Compile a pattern such as `**/tasks/byid/*`
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut expr = String::from("^");
        let mut specificity = Specificity::default();

        for segment in trimmed.split('/') {
            match segment {
                "" => return Err(PatternError::EmptySegment(pattern.to_string())),
                "**" => {
                    expr.push_str("((?:/[^/]+)*)");
                    specificity.deep_wildcards += 1;
                }
                "*" => {
                    expr.push_str("/([^/]+)");
                    specificity.wildcards += 1;
                }
                s if s.contains("**") => {
                    return Err(PatternError::MisplacedDoubleWildcard(pattern.to_string()))
                }
                s if s.contains('*') => {
                    expr.push('/');
                    for (i, part) in s.split('*').enumerate() {
                        if i > 0 {
                            expr.push_str("([^/]*)");
                            specificity.wildcards += 1;
                        }
                        expr.push_str(&regex::escape(part));
                    }
                    specificity.partial_segments += 1;
                }
                s => {
                    expr.push('/');
                    expr.push_str(&regex::escape(s));
                    specificity.literal_segments += 1;
                }
            }
        }
        expr.push_str("/?$");

        let regex = Regex::new(&expr).map_err(|e| PatternError::Compile {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            specificity,
        })
    }

    /// Match a request path (without query string)
    pub fn matches(&self, path: &str) -> Option<RouteMatch> {
        let caps = self.regex.captures(path)?;
        let captures = caps
            .iter()
            .skip(1)
            .map(|m| {
                m.map(|m| m.as_str().trim_start_matches('/').to_string())
                    .unwrap_or_default()
            })
            .collect();
        Some(RouteMatch { captures })
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = UrlPattern::parse("/todos/create").unwrap();
        assert!(pattern.matches("/todos/create").is_some());
        assert!(pattern.matches("/todos/create/").is_some());
        assert!(pattern.matches("/todos/created").is_none());
        assert!(pattern.matches("/api/todos/create").is_none());
    }

    #[test]
    fn test_leading_deep_wildcard() {
        let pattern = UrlPattern::parse("**/todos/create").unwrap();
        assert!(pattern.matches("/todos/create").is_some());
        assert!(pattern.matches("/api/v1/todos/create").is_some());
        assert!(pattern.matches("/todos/create/extra").is_none());
    }

    #[test]
    fn test_single_wildcard_captures_id() {
        let pattern = UrlPattern::parse("**/todos/byid/*").unwrap();

        let route = pattern.matches("/todos/byid/stub_todo_1").unwrap();
        assert_eq!(route.last_segment(), Some("stub_todo_1"));
        assert_eq!(route.get(0), Some(""));

        let route = pattern.matches("/api/todos/byid/abc").unwrap();
        assert_eq!(route.captures(), &["api".to_string(), "abc".to_string()]);

        assert!(pattern.matches("/todos/byid/").is_none());
        assert!(pattern.matches("/todos/byid/a/b").is_none());
    }

    #[test]
    fn test_trailing_deep_wildcard() {
        let pattern = UrlPattern::parse("/tasks/ofuser/**").unwrap();
        assert!(pattern.matches("/tasks/ofuser").is_some());
        let route = pattern.matches("/tasks/ofuser/u1/extra").unwrap();
        assert_eq!(route.last_segment(), Some("u1/extra"));
    }

    #[test]
    fn test_partial_segment() {
        let pattern = UrlPattern::parse("/files/report-*.json").unwrap();
        let route = pattern.matches("/files/report-2024.json").unwrap();
        assert_eq!(route.last_segment(), Some("2024"));
        assert!(pattern.matches("/files/summary.json").is_none());
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let pattern = UrlPattern::parse("/a.b/(c)").unwrap();
        assert!(pattern.matches("/a.b/(c)").is_some());
        assert!(pattern.matches("/axb/(c)").is_none());
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(UrlPattern::parse("").unwrap_err(), PatternError::Empty);
        assert_eq!(UrlPattern::parse("/").unwrap_err(), PatternError::Empty);
        assert!(matches!(
            UrlPattern::parse("/a//b"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            UrlPattern::parse("/a/b**"),
            Err(PatternError::MisplacedDoubleWildcard(_))
        ));
    }

    #[test]
    fn test_specificity_ordering() {
        let literal = UrlPattern::parse("/todos/byid/special").unwrap().specificity();
        let single = UrlPattern::parse("/todos/byid/*").unwrap().specificity();
        let deep_single = UrlPattern::parse("**/todos/byid/*").unwrap().specificity();
        let deep = UrlPattern::parse("**/byid/*").unwrap().specificity();
        let partial = UrlPattern::parse("/todos/byid/spec*").unwrap().specificity();

        assert!(literal > partial);
        assert!(partial > single);
        assert!(single > deep_single);
        assert!(deep_single > deep);
    }

    #[test]
    fn test_display() {
        let pattern = UrlPattern::parse("**/tasks/byid/*").unwrap();
        assert_eq!(pattern.to_string(), "**/tasks/byid/*");
    }
}
