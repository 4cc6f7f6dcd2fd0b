// router.rs: Route table, CORS policy, and middleware stack.

use axum::http::{header, Method};
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{create_goal, delete_goal, list_goals, metrics_handler, not_found};
use crate::middleware::track_request;
use crate::state::AppState;

/// Build the application router.
///
/// The request-tracking layer sits outside CORS so preflight responses
/// are measured and logged like any other request.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(cors_layer())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            track_request,
        ))
        .with_state(state)
}

/// Any origin, the three goal methods plus OPTIONS, and `Content-Type`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
