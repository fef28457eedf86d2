//! Structured request logging middleware for the mock HTTP server
//!
//! Emits one tracing event per request with method, path, status, timing and
//! a truncated summary of form parameters.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::form::FormBody;
use crate::server::CONTROL_PREFIX;

/// Maximum length for parameter values before truncation
const MAX_PARAM_LENGTH: usize = 30;

/// Truncation suffix for long parameters
const TRUNCATION_SUFFIX: &str = "...";

/// Request logging middleware
///
/// Control endpoints log at debug level; everything else at info.
pub async fn request_logging_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path.starts_with(CONTROL_PREFIX) {
        let response = next.run(request).await;
        debug!(
            %method,
            %path,
            status = response.status().as_u16(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Control request"
        );
        return Ok(response);
    }

    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let (request, params_summary) = if is_form {
        let (parts, body) = request.into_parts();
        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(%method, %path, error = %e, "Failed to read request body");
                return Err(StatusCode::BAD_REQUEST);
            }
        };
        let summary = std::str::from_utf8(&body_bytes)
            .map(|text| format_params_summary(&FormBody::from_urlencoded(text)))
            .unwrap_or_else(|_| "<invalid utf-8>".to_string());
        (Request::from_parts(parts, Body::from(body_bytes)), summary)
    } else {
        (request, String::new())
    };

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        params = %params_summary,
        "Handled request"
    );

    Ok(response)
}

/// Format form fields into a summary string with truncation
fn format_params_summary(form: &FormBody) -> String {
    form.fields()
        .iter()
        .map(|(key, value)| {
            if is_sensitive_parameter(key) {
                format!("{key}=\"[REDACTED]\"")
            } else {
                format!("{key}=\"{}\"", truncate_string(value, MAX_PARAM_LENGTH))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncate string to max length in characters, with suffix
fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let truncated_length = max_length.saturating_sub(TRUNCATION_SUFFIX.len());
        let truncated: String = input.chars().take(truncated_length).collect();
        format!("{truncated}{TRUNCATION_SUFFIX}")
    }
}

/// Check if parameter should be redacted for security
fn is_sensitive_parameter(key: &str) -> bool {
    let sensitive_keys = [
        "password",
        "token",
        "secret",
        "key",
        "auth",
        "authorization",
        "credential",
        "api_key",
        "access_token",
        "refresh_token",
    ];

    let key_lower = key.to_lowercase();
    sensitive_keys
        .iter()
        .any(|&sensitive| key_lower.contains(sensitive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("this is a very long string", 10), "this is...");
        assert_eq!(truncate_string("exactly10c", 10), "exactly10c");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_string("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_format_params_summary() {
        let form = FormBody::from_urlencoded(
            "taskid=stub_task_1&description=This+is+a+very+long+description+that+gets+cut",
        );

        let summary = format_params_summary(&form);
        assert!(summary.contains("taskid=\"stub_task_1\""));
        assert!(summary.contains("description=\"This is a very long descrip...\""));
    }

    #[test]
    fn test_sensitive_parameter_redaction() {
        let form = FormBody::from_urlencoded("description=visible&api_key=hidden");

        let summary = format_params_summary(&form);
        assert!(summary.contains("description=\"visible\""));
        assert!(summary.contains("api_key=\"[REDACTED]\""));
        assert!(!summary.contains("hidden"));
    }

    #[test]
    fn test_is_sensitive_parameter() {
        assert!(is_sensitive_parameter("password"));
        assert!(is_sensitive_parameter("access_token"));
        assert!(is_sensitive_parameter("AUTH_TOKEN"));
        assert!(!is_sensitive_parameter("description"));
        assert!(!is_sensitive_parameter("taskid"));
        assert!(!is_sensitive_parameter("done"));
    }
}
