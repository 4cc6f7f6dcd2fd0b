//! # goals-api
//!
//! REST API for creating, listing, and deleting goals.
//!
//! | Method | Path          | Success                           |
//! |--------|---------------|-----------------------------------|
//! | GET    | `/goals`      | 200 `{goals: [{id, text}]}`       |
//! | POST   | `/goals`      | 201 `{message, goal: {id, text}}` |
//! | DELETE | `/goals/{id}` | 200 `{message}`                   |
//! | GET    | `/metrics`    | 200 OpenMetrics text              |
//!
//! Every response records one `http_request_duration_ms` observation.
//! Completed store calls bump `goals_operations_total`, and rejected input
//! bumps `validation_errors_total` without ever reaching the store.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use metrics::{GoalMetrics, Operation, Outcome};
pub use router::build_router;
pub use state::AppState;
pub use validation::{validate_goal_text, ValidationError, MAX_GOAL_LEN};
