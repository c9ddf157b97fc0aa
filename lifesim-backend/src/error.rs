use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Player not found")]
    PlayerNotFound,

    #[error("NPC not found")]
    NpcNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    PdfError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::PlayerNotFound => (StatusCode::NOT_FOUND, "Player not found"),
            AppError::NpcNotFound => (StatusCode::NOT_FOUND, "NPC not found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::DatabaseError(_) => {
                tracing::error!("Database error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::IoError(_) => {
                tracing::error!("IO error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error")
            }
            // Only produced when the scene file on disk is malformed
            AppError::JsonError(_) => {
                tracing::error!("JSON error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid stored JSON")
            }
            AppError::PdfError(_) => {
                tracing::error!("PDF error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "PDF rendering failed")
            }
            AppError::ServerError(_) => {
                tracing::error!("Server error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::PlayerNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NpcNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("hours".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PdfError("font".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
