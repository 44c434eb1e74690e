use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures the Telegram core can surface to its callers.
///
/// Avatar downloads and post-login profile refreshes are never reported
/// through this type; those are logged and swallowed where they happen.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Could not establish or restore a connection to Telegram.
    #[error("failed to connect to Telegram: {0}")]
    Connection(String),

    /// No live client is registered for the account. Expected and
    /// recoverable; callers fall back to creating one.
    #[error("no active client for account {0}")]
    NotRegistered(String),

    /// Telegram rejected a login step. Carries the provider's message.
    #[error("Telegram authentication failed: {0}")]
    Auth(String),

    /// A dialog or message fetch failed at the transport level.
    #[error("failed to fetch from Telegram: {0}")]
    Fetch(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for TelegramError {
    fn status_code(&self) -> StatusCode {
        match self {
            TelegramError::Auth(_) => StatusCode::BAD_REQUEST,
            TelegramError::Connection(_) | TelegramError::Fetch(_) => StatusCode::BAD_GATEWAY,
            TelegramError::NotRegistered(_) | TelegramError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}
