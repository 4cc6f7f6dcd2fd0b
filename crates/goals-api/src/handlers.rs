// handlers.rs: Request handlers for the goals endpoints and /metrics.
//
// Each goal handler makes at most one store call and bumps exactly one
// counter: the operation counter when the store was called, or the
// validation counter when the input was rejected first.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use goals_store::{Goal, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::metrics::{Operation, Outcome, OPENMETRICS_CONTENT_TYPE};
use crate::state::AppState;
use crate::validation::validate_goal_text;

/// A goal as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalView {
    pub id: String,
    pub text: String,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id.to_string(),
            text: goal.text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalListResponse {
    pub goals: Vec<GoalView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGoalResponse {
    pub message: String,
    pub goal: GoalView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /goals
pub async fn list_goals(State(state): State<AppState>) -> Result<Json<GoalListResponse>, ApiError> {
    let goals = record_store_call(&state, Operation::Fetch, state.store.list_all().await)?;
    info!(count = goals.len(), "fetched goals");
    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(GoalView::from).collect(),
    }))
}

/// POST /goals
///
/// The body is decoded leniently: anything that isn't a JSON object with a
/// string `text` field counts as missing text.
pub async fn create_goal(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateGoalResponse>), ApiError> {
    let submitted = goal_text_from_body(&body);
    let text = match validate_goal_text(submitted.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            state.metrics.record_validation_error(e);
            warn!(error_type = e.label(), "rejected goal text");
            return Err(e.into());
        }
    };

    let goal = record_store_call(&state, Operation::Create, state.store.create(text).await)?;
    info!(goal_id = %goal.id, "stored new goal");
    Ok((
        StatusCode::CREATED,
        Json(CreateGoalResponse {
            message: "Goal saved".to_string(),
            goal: goal.into(),
        }),
    ))
}

/// DELETE /goals/{id}
///
/// Succeeds whether or not a goal with that id existed.
pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = record_store_call(&state, Operation::Delete, state.store.delete_by_id(&id).await)?;
    info!(goal_id = %id, removed, "deleted goal");
    Ok(Json(MessageResponse {
        message: "Deleted goal!".to_string(),
    }))
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Fallback for unknown paths.
pub async fn not_found() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse {
            message: "Not found.".to_string(),
        }),
    )
}

/// Count the outcome of a store call and turn failures into `ApiError`.
fn record_store_call<T>(
    state: &AppState,
    operation: Operation,
    result: Result<T, StoreError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            state.metrics.record_operation(operation, Outcome::Success);
            Ok(value)
        }
        Err(source) => {
            state.metrics.record_operation(operation, Outcome::Error);
            error!(
                operation = operation.as_str(),
                backend = state.store.backend_tag(),
                error = %source,
                "store call failed"
            );
            Err(ApiError::Store { operation, source })
        }
    }
}

fn goal_text_from_body(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("text")?.as_str().map(str::to_owned)
}
