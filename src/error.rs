use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Marker text surfaced when no Postgres connection string is
/// configured. The classifier maps it to 503.
pub const MISSING_CONNECTION_MESSAGE: &str = "Missing DB connection string. \
Set POSTGRES_URL_NON_POOLING or DATABASE_URL/DATABASE_URL_UNPOOLED.";

/// Failures raised by the persistence backends. Not-found is a normal
/// negative result (`Ok(None)` / `Ok(false)`), never a variant here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Title is required.")]
    TitleRequired,

    #[error("Title cannot be empty.")]
    TitleEmpty,

    #[error("{MISSING_CONNECTION_MESSAGE}")]
    MissingConnectionString,

    /// All configured connection candidates failed; carries the last
    /// attempt's error text and driver code.
    #[error("Failed to connect to database: {message} ({code})")]
    Connection { message: String, code: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP status this failure surfaces as: validation → 400, storage
    /// unconfigured → 503, anything else → 500.
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::TitleRequired | StoreError::TitleEmpty => StatusCode::BAD_REQUEST,
            StoreError::MissingConnectionString => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Translate a store failure into the `{ "error": message }` response
/// body the API returns. `fallback` is used if the error somehow
/// renders to an empty message.
pub fn api_error(error: &StoreError, fallback: &str) -> (StatusCode, Json<Value>) {
    let message = error.to_string();
    let message = if message.is_empty() {
        fallback.to_string()
    } else {
        message
    };
    (error.status(), Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_classify_to_400() {
        assert_eq!(StoreError::TitleRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(StoreError::TitleEmpty.status(), StatusCode::BAD_REQUEST);
        assert_eq!(StoreError::TitleRequired.to_string(), "Title is required.");
        assert_eq!(StoreError::TitleEmpty.to_string(), "Title cannot be empty.");
    }

    #[test]
    fn missing_connection_string_classifies_to_503() {
        let err = StoreError::MissingConnectionString;
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("Missing DB connection string"));
    }

    #[test]
    fn unrecognized_errors_classify_to_500() {
        let err = StoreError::Connection {
            message: "connection refused".into(),
            code: "UNKNOWN".into(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Failed to connect to database: connection refused (UNKNOWN)"
        );
    }

    #[test]
    fn api_error_surfaces_the_message() {
        let (status, Json(body)) = api_error(&StoreError::TitleRequired, "Failed to create todo.");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required.");
    }
}
