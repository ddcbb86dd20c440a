use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Todo not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl IntoResponse for TodoError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            TodoError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            TodoError::NotFound => (StatusCode::NOT_FOUND, "Todo not found".to_string()),
            TodoError::Database(_) | TodoError::Storage(_) => {
                // Backing store detail stays in the logs, never in the body.
                tracing::error!(error = %self, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
