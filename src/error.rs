use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Snapshot load error: {0}")]
    Load(String),

    #[error("Missing credential: {0}")]
    Credential(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Rebuild failed: {0}")]
    Rebuild(String),

    #[error("Snapshot write error: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for failures of an outbound call, which the aggregation pass absorbs
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::ExternalApi(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Credential(msg) | AppError::Configuration(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Load(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ExternalApi(msg) | AppError::Rebuild(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Transport(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Snapshot(_) | AppError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
