// error.rs: Error types for the goals API and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use goals_store::StoreError;
use thiserror::Error;

use crate::handlers::MessageResponse;
use crate::metrics::Operation;
use crate::validation::ValidationError;

/// Errors a request can end with.
///
/// Store failures keep their source for logging, but the client only ever
/// sees the generic per-operation message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The submitted goal text was rejected before reaching the store.
    #[error("invalid goal text: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed while serving the operation.
    #[error("{operation} failed: {source}")]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(e) => e.status(),
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn client_message(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.message(),
            ApiError::Store { operation, .. } => match operation {
                Operation::Fetch => "Fallo al cargar los Items.",
                Operation::Create => "Failed to save goal.",
                Operation::Delete => "Failed to delete goal.",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(MessageResponse {
                message: self.client_message().to_string(),
            }),
        )
            .into_response()
    }
}
