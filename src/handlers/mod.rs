pub mod auth;
pub mod business;
pub mod views;

use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::models::ProviderProfile;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Profile stored for the request's session cookie, if any.
pub async fn current_profile(
    req: &HttpRequest,
    state: &AppState,
) -> Result<Option<ProviderProfile>, AppError> {
    match req.cookie(SESSION_COOKIE) {
        Some(cookie) => Ok(state.sessions.load(cookie.value()).await?),
        None => Ok(None),
    }
}
