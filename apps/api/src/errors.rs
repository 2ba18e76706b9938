use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Client errors (unknown session, bad upload, bad input) carry a 4xx status
/// and are never retried. Collaborator failures are normally absorbed by the
/// chat pipeline's fallbacks; the variants here cover the two cases that must
/// surface: a configured language backend failing mid-answer, and a knowledge
/// store refusing an administrative prune.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Knowledge store error: {0}")]
    Knowledge(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {id} not found. Upload a CV to start a new session."),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFileType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FILE_TYPE",
                msg.clone(),
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "The language backend failed to produce an answer".to_string(),
                )
            }
            AppError::Knowledge(msg) => {
                tracing::error!("Knowledge store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "KNOWLEDGE_STORE_ERROR",
                    "The knowledge store rejected the operation".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
