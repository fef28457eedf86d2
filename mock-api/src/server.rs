//! HTTP front for the interceptor
//!
//! Every request outside the control prefix goes through the interceptor.
//! Matched requests get the synthesized response; unmatched requests are
//! forwarded to the configured upstream, or answered with 404 when there is
//! none.
//!
//! Control endpoints under `/__mock`:
//! - `GET /__mock/health`
//! - `GET /__mock/state` returns every task
//! - `POST /__mock/reset` reloads the seed and forgets completions
//! - `GET /__mock/calls/{alias}/next?timeout_ms=N` waits for the next
//!   completion of a rule (200, 404 for unknown aliases, 408 on timeout)

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};
use url::Url;

use todo_core::{ResourceStore, Task};

use crate::completions::WaitError;
use crate::error::ApiError;
use crate::interceptor::Interceptor;
use crate::request::{InterceptedRequest, Outcome};
use crate::serialization::ack_body;

/// Path prefix of the control endpoints
pub const CONTROL_PREFIX: &str = "/__mock";

/// Wait timeout used when a control request does not give one
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(4);

/// Produces the tasks a reset restores
pub type SeedProvider = Arc<dyn Fn() -> Vec<Task> + Send + Sync>;

/// Headers that describe a single connection and must not be forwarded
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Forwards unmatched requests to the real backend
#[derive(Debug, Clone)]
pub struct Upstream {
    base: Url,
    client: reqwest::Client,
}

impl Upstream {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base)
            .map_err(|e| ApiError::Upstream(format!("Invalid upstream URL '{base}': {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Upstream(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { base, client })
    }

    /// Upstream URL for a request path, keeping any path prefix of the base
    pub fn target_url(&self, path_and_query: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}{}",
            self.base.as_str().trim_end_matches('/'),
            path_and_query
        );
        Url::parse(&joined)
            .map_err(|e| ApiError::Upstream(format!("Invalid upstream target '{joined}': {e}")))
    }

    /// Send `request` upstream and relay the answer
    pub async fn forward(&self, request: &InterceptedRequest) -> Result<Response, ApiError> {
        let url = self.target_url(&request.path_and_query())?;

        let mut outgoing = self.client.request(request.method.clone(), url.clone());
        for (name, value) in request.headers.iter().filter(|(name, _)| !is_hop_by_hop(name)) {
            outgoing = outgoing.header(name, value);
        }

        let upstream = outgoing
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("{url}: {e}")))?;

        let status = upstream.status();
        let headers = upstream.headers().clone();
        let body = upstream
            .bytes()
            .await
            .map_err(|e| ApiError::Upstream(format!("{url}: {e}")))?;

        let mut response = Response::builder().status(status);
        for (name, value) in headers.iter().filter(|(name, _)| !is_hop_by_hop(name)) {
            response = response.header(name, value);
        }
        response
            .body(Body::from(body))
            .map_err(|e| ApiError::Upstream(e.to_string()))
    }
}

/// Shared server state for handlers
pub struct MockServerState<S> {
    pub interceptor: Arc<Interceptor<S>>,
    pub upstream: Option<Upstream>,
    pub seed: SeedProvider,
}

/// Mock backend HTTP server
pub struct MockServer<S> {
    interceptor: Arc<Interceptor<S>>,
    upstream: Option<Upstream>,
    seed: SeedProvider,
}

impl<S: ResourceStore + 'static> MockServer<S> {
    pub fn new(interceptor: Arc<Interceptor<S>>, seed: SeedProvider) -> Self {
        Self {
            interceptor,
            upstream: None,
            seed,
        }
    }

    /// Forward unmatched requests to `upstream`
    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn interceptor(&self) -> &Arc<Interceptor<S>> {
        &self.interceptor
    }

    /// Start the server on `addr` and run until the process ends
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))?;

        let listener = TcpListener::bind(socket_addr).await?;
        self.serve_with_shutdown(listener, std::future::pending())
            .await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting mock server on {}", listener.local_addr()?);
        let app = self.create_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Create the router with control endpoints and the intercept fallback
    pub fn create_router(self) -> Router {
        let state = Arc::new(MockServerState {
            interceptor: self.interceptor,
            upstream: self.upstream,
            seed: self.seed,
        });

        Router::new()
            .route("/__mock/health", get(health_handler))
            .route("/__mock/state", get(state_handler::<S>))
            .route("/__mock/reset", post(reset_handler::<S>))
            .route("/__mock/calls/:alias/next", get(wait_handler::<S>))
            .fallback(intercept_handler::<S>)
            .layer(middleware::from_fn(
                crate::request_logger::request_logging_middleware,
            ))
            .with_state(state)
    }
}

async fn intercept_handler<S: ResourceStore + 'static>(
    State(state): State<Arc<MockServerState<S>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = InterceptedRequest::from_parts(method, &uri, headers, body.to_vec());

    match state.interceptor.dispatch(&request) {
        Outcome::Reply { response, .. } => response.into_response(),
        Outcome::PassThrough => match &state.upstream {
            Some(upstream) => match upstream.forward(&request).await {
                Ok(response) => response,
                Err(err) => {
                    error!(path = %request.path, error = %err, "Upstream request failed");
                    error_response(&err)
                }
            },
            None => error_response(&ApiError::NoUpstream(request.path_and_query())),
        },
    }
}

fn error_response(err: &ApiError) -> Response {
    (err.status(), Json(err.to_json_body())).into_response()
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn state_handler<S: ResourceStore + 'static>(
    State(state): State<Arc<MockServerState<S>>>,
) -> Response {
    Json(state.interceptor.snapshot()).into_response()
}

async fn reset_handler<S: ResourceStore + 'static>(
    State(state): State<Arc<MockServerState<S>>>,
) -> Response {
    match state.interceptor.reset((state.seed)()) {
        Ok(()) => {
            info!("Store reset to seed");
            Json(ack_body()).into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to reset store");
            error_response(&ApiError::from(err))
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaitParams {
    timeout_ms: Option<u64>,
}

async fn wait_handler<S: ResourceStore + 'static>(
    State(state): State<Arc<MockServerState<S>>>,
    Path(alias): Path<String>,
    Query(params): Query<WaitParams>,
) -> Response {
    let timeout = params
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_WAIT_TIMEOUT);

    match state.interceptor.wait_next(&alias, timeout).await {
        Ok(completion) => Json(completion).into_response(),
        Err(err @ WaitError::UnknownAlias(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "ok": false, "error": err.to_string() })),
        )
            .into_response(),
        Err(err @ WaitError::Timeout { .. }) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(serde_json::json!({ "ok": false, "error": err.to_string() })),
        )
            .into_response(),
    }
}
