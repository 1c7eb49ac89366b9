use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Timed out after {timeout_ms}ms waiting for selector {selector}")]
    Timeout { selector: String, timeout_ms: u64 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transaction error: {0}")]
    Transaction(sqlx::Error),

    #[error("Query error: {0}")]
    Query(sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Message behind the error, without the variant prefix.
    fn detail(&self) -> String {
        match self {
            AppError::Transaction(e) | AppError::Query(e) | AppError::Database(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Query(_) | AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao recuperar os resultados")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        tracing::error!(status = status.as_u16(), "{message}: {self}");
        let body = serde_json::json!({
            "message": message,
            "error": self.detail(),
        });
        (status, Json(body)).into_response()
    }
}
