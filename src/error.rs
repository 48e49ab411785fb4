use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::session::SessionError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization was denied by the provider: {reason}")]
    Denied { reason: String },

    #[error("authorization state mismatch")]
    StateMismatch,

    #[error("callback is missing the authorization code")]
    MissingCode,

    #[error("token exchange failed: {reason}")]
    TokenExchange { reason: String },

    #[error("profile request failed: {reason}")]
    ProfileFetch { reason: String },

    #[error("provider returned an unusable profile")]
    UnusableProfile,

    #[error("provider endpoint is not a valid base url")]
    Endpoint,

    #[error("provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

// Request URLs carry the app secret and access token in their query.
impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Transport(e.without_url())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(_) | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Session(_) | AppError::Database(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation(err) => HttpResponse::build(status).json(json!({
                "error": "validation failed",
                "violations": err.violations,
            })),
            AppError::Auth(err) => HttpResponse::build(status).json(json!({
                "error": "authentication failed",
                "reason": err.to_string(),
            })),
            _ if status.is_server_error() => {
                error!("request failed: {self}");
                HttpResponse::build(status).json(json!({"error": "internal server error"}))
            }
            _ => HttpResponse::build(status).json(json!({"error": self.to_string()})),
        }
    }
}
