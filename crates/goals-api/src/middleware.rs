// middleware.rs: Per-request duration metric and access log.
//
// Wraps every route (and the 404 fallback), so each response records
// exactly one `http_request_duration_ms` observation, failures included.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::http::header::USER_AGENT;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Tracing target of the one-line-per-request access log.
pub const ACCESS_LOG_TARGET: &str = "goals_api::access";

pub async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let started = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let status = response.status().as_u16();
    state
        .metrics
        .observe_request(method.as_str(), &route, status, duration_ms);

    tracing::info!(
        target: ACCESS_LOG_TARGET,
        method = %method,
        path = %path,
        route = %route,
        status,
        duration_ms,
        user_agent = %user_agent,
        remote = %remote,
        "request completed"
    );

    response
}
