//! Intercepted requests and synthesized responses

use axum::{
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::error::ApiError;
use crate::form::FormBody;
use crate::rules::RuleId;
use crate::serialization::ack_body;

/// Base used to resolve relative request URLs
const RELATIVE_BASE: &str = "http://mock.invalid/";

/// An outgoing front-end request as seen by the interceptor
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    pub method: Method,
    /// Path only, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl InterceptedRequest {
    /// Build a request from a full URL (`http://host:5000/tasks/byid/1`) or
    /// a path with optional query (`/tasks/byid/1?x=1`)
    pub fn new(method: Method, url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(RELATIVE_BASE)
            .map_err(|e| ApiError::Decode(format!("Invalid base URL: {e}")))?;
        let parsed = base
            .join(url)
            .map_err(|e| ApiError::Decode(format!("Invalid request URL '{url}': {e}")))?;

        Ok(Self {
            method,
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
            headers: HeaderMap::new(),
            body: Vec::new(),
        })
    }

    /// Build a request from the parts an HTTP server hands over
    pub fn from_parts(method: Method, uri: &Uri, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        }
    }

    /// Attach a urlencoded form body, as the front end sends it
    pub fn with_form(mut self, pairs: &[(&str, &str)]) -> Self {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = body.into_bytes();
        self
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: &Value) -> Self {
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = body.to_string().into_bytes();
        self
    }

    /// Attach raw bytes with no content type
    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Decode the body into form fields
    pub fn form(&self) -> Result<FormBody, ApiError> {
        FormBody::decode(self.content_type(), &self.body)
    }

    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// A response synthesized by a rule handler
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl MockResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 with a JSON body
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 200 `{"ok": true}`
    pub fn ack() -> Self {
        Self::new(StatusCode::OK, ack_body())
    }

    /// 201 `{"ok": true}`
    pub fn created_ack() -> Self {
        Self::new(StatusCode::CREATED, ack_body())
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self::new(error.status(), error.to_json_body())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Result of dispatching a request through the interceptor
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A rule matched and produced this response
    Reply { rule: RuleId, response: MockResponse },
    /// No rule matched; the request goes to the real network
    PassThrough,
}

impl Outcome {
    pub fn response(&self) -> Option<&MockResponse> {
        match self {
            Outcome::Reply { response, .. } => Some(response),
            Outcome::PassThrough => None,
        }
    }

    pub fn rule(&self) -> Option<RuleId> {
        match self {
            Outcome::Reply { rule, .. } => Some(*rule),
            Outcome::PassThrough => None,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Outcome::PassThrough)
    }
}
