//! The single error boundary for the HTTP surface.
//!
//! Every failure a handler can produce funnels into [`ApiError`], whose
//! `IntoResponse` impl owns the error-to-response mapping. Store-level
//! failures stay `anyhow` until they cross this boundary.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::Database;

/// One entry of a structured validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub location: String,
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            location: location.into(),
            messages: vec![message.into()],
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The note id did not resolve to a record (or was not a well-formed
    /// identifier for the store).
    #[error("Note does not exist")]
    NotFound,

    /// Input failed the per-route rules before reaching the handler body.
    #[error("Validation Error")]
    Validation(Vec<FieldError>),

    /// The store rejected a write because another note already carries the
    /// same `text`.
    #[error("\"text\" already exists")]
    DuplicateText,

    /// Anything else. Logged server-side, sanitized for the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Map a store error from a note write: a unique-constraint violation
    /// on `text` becomes [`ApiError::DuplicateText`], everything else
    /// passes through unchanged.
    pub fn map_duplicate(err: anyhow::Error) -> Self {
        if let Some(sql_err) = err.downcast_ref::<rusqlite::Error>() {
            if Database::is_unique_violation(sql_err, "text") {
                return ApiError::DuplicateText;
            }
        }
        ApiError::Internal(err)
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, errors) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Note does not exist".to_string(),
                None,
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation Error".to_string(),
                Some(errors),
            ),
            ApiError::DuplicateText => (
                StatusCode::CONFLICT,
                "Validation Error".to_string(),
                Some(vec![FieldError::new(
                    "text",
                    "body",
                    "\"text\" already exists",
                )]),
            ),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            code: status.as_u16(),
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
