//! Error types for the lookup server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] pesp_lookup::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not-found"),
            Error::Validation(_) | Error::Lookup(pesp_lookup::Error::UnknownKind(_)) => {
                (StatusCode::BAD_REQUEST, "invalid")
            }
            Error::Lookup(pesp_lookup::Error::IntegrityViolation { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "integrity-violation")
            }
            Error::Lookup(_)
            | Error::Database(_)
            | Error::Migration(_)
            | Error::Config(_)
            | Error::Internal(_)
            | Error::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "exception"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Error::Lookup(pesp_lookup::Error::IntegrityViolation { .. }) => {
                tracing::error!(error = %self, "Lookup data integrity violation");
                "Lookup table contains non unique element".to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
