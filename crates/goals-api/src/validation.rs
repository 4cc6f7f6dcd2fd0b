// validation.rs: Rules a goal's text must pass before it is stored.
//
// The rules run in a fixed order and the first failure wins:
//   1. missing or blank        → 422 empty_text
//   2. only decimal digits     → 422 only_numbers
//   3. longer than MAX_GOAL_LEN → 413 max_length_exceeded
//
// The numeric rule runs before the length rule, so "12345678901" is
// rejected as numeric (422), not as too long (413). Clients depend on
// this order through the status codes they see.

use axum::http::StatusCode;
use thiserror::Error;

/// Longest accepted goal text after trimming, in UTF-16 code units (the
/// length a browser client reports for the same string).
pub const MAX_GOAL_LEN: usize = 10;

/// Why a goal's text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("goal text is missing or blank")]
    EmptyText,

    #[error("goal text is only digits")]
    OnlyNumbers,

    #[error("goal text is longer than 10 characters")]
    MaxLengthExceeded,
}

impl ValidationError {
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::EmptyText | ValidationError::OnlyNumbers => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ValidationError::MaxLengthExceeded => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Value of the `error_type` label on `validation_errors_total`.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationError::EmptyText => "empty_text",
            ValidationError::OnlyNumbers => "only_numbers",
            ValidationError::MaxLengthExceeded => "max_length_exceeded",
        }
    }

    /// Message returned to the client.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::EmptyText => "Texto Invalido.",
            ValidationError::OnlyNumbers => "El Item no puede ser unicamente numerico.",
            ValidationError::MaxLengthExceeded => {
                "El texto no puede tener más de 10 caracteres."
            }
        }
    }
}

/// Check raw goal text. Returns the text to persist, which is the input
/// untouched; trimming only feeds the checks.
pub fn validate_goal_text(text: Option<&str>) -> Result<&str, ValidationError> {
    let raw = text.ok_or(ValidationError::EmptyText)?;
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::OnlyNumbers);
    }
    if trimmed.encode_utf16().count() > MAX_GOAL_LEN {
        return Err(ValidationError::MaxLengthExceeded);
    }
    Ok(raw)
}
