use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{AppError, AuthError};
use crate::services::facebook::FacebookClient;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

pub const STATE_COOKIE: &str = "oauth_state";

const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn cookie(name: &'static str, value: String, secure: bool, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .finish()
}

fn removal(name: &'static str) -> Cookie<'static> {
    let mut c = Cookie::build(name, "").path("/").finish();
    c.make_removal();
    c
}

// GET /auth/facebook
pub async fn facebook_login(state: web::Data<AppState>) -> HttpResponse {
    let oauth_state = FacebookClient::new_state();
    let location = state.facebook.authorize_url(&oauth_state);

    HttpResponse::Found()
        .append_header((LOCATION, location.as_str()))
        .cookie(cookie(
            STATE_COOKIE,
            oauth_state,
            state.config.cookie_secure,
            CookieDuration::minutes(STATE_TTL_MINUTES),
        ))
        .finish()
}

// GET /auth/facebook/callback
//
// The state cookie is single-use: it is cleared whether or not login succeeds.
pub async fn facebook_callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let mut resp = match complete_login(&req, query.into_inner(), &state).await {
        Ok(resp) => resp,
        Err(e) => e.error_response(),
    };

    if let Err(e) = resp.add_cookie(&removal(STATE_COOKIE)) {
        warn!("failed to clear oauth state cookie: {e}");
    }
    resp
}

async fn complete_login(
    req: &HttpRequest,
    q: CallbackQuery,
    state: &AppState,
) -> Result<HttpResponse, AppError> {
    if let Some(error) = q.error {
        warn!("provider denied login: {error}");
        return Err(AuthError::Denied {
            reason: q.error_description.unwrap_or(error),
        }
        .into());
    }

    let expected = req.cookie(STATE_COOKIE).map(|c| c.value().to_string());
    match (expected.as_deref(), q.state.as_deref()) {
        (Some(expected), Some(returned)) if expected == returned => {}
        _ => {
            warn!("oauth state mismatch on callback");
            return Err(AuthError::StateMismatch.into());
        }
    }

    let code = q
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingCode)?;

    let authenticated = state.facebook.authenticate(&code).await.map_err(|e| {
        warn!("facebook login failed: {e}");
        e
    })?;

    let token = state.sessions.create(&authenticated.profile).await?;
    info!("facebook login succeeded");

    Ok(HttpResponse::Found()
        .append_header((LOCATION, state.config.client_url.as_str()))
        .cookie(cookie(
            SESSION_COOKIE,
            token,
            state.config.cookie_secure,
            CookieDuration::days(state.config.session_ttl_days),
        ))
        .finish())
}

// GET /auth/me
pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let profile = super::current_profile(&req, &state)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(profile))
}

// GET|POST /auth/logout
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if let Some(c) = req.cookie(SESSION_COOKIE) {
        state.sessions.destroy(c.value()).await?;
    }

    Ok(HttpResponse::Ok()
        .cookie(removal(SESSION_COOKIE))
        .json(json!({"message": "Logged out"})))
}
