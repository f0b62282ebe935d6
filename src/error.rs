// src/error.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// A failed store call. Every variant reaches the caller as the same
/// `{ "error": message }` body; the variant only picks a status when strict
/// status mapping is on.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MultipleRows(String),

    #[error("{0}")]
    Constraint(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Constraint(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Several rows behind one id means the store itself is inconsistent.
            StoreError::MultipleRows(_) | StoreError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Path(#[from] PathRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(e) => e.status(),
            ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Renders the uniform error body. Without `strict_status` the response
    /// keeps the default 200 and only the body shape signals failure.
    pub fn into_response_with(self, strict_status: bool) -> Response {
        let status = if strict_status {
            self.status()
        } else {
            StatusCode::OK
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
