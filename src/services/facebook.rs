use rand::{distr::Alphanumeric, Rng};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::FacebookConfig;
use crate::error::AuthError;
use crate::models::{profile, ProviderProfile};

/// Profile fields requested at login. Fixed, not configurable per request.
pub const PROFILE_FIELDS: [&str; 4] = ["id", "emails", "name", "picture.type(large)"];

const STATE_LEN: usize = 32;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct GraphErrorBody {
    error: GraphError,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// What the callback hands to the session layer.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub tokens: Tokens,
    pub profile: ProviderProfile,
}

#[derive(Clone)]
pub struct FacebookClient {
    client: Client,
    config: FacebookConfig,
}

impl FacebookClient {
    pub fn new(config: FacebookConfig) -> Self {
        FacebookClient {
            client: Client::new(),
            config,
        }
    }

    pub fn new_state() -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect()
    }

    /// Consent screen URL the caller is redirected to.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.config.dialog_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.app_id)
            .append_pair("redirect_uri", self.config.callback_url.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", "email")
            .append_pair("state", state);
        url
    }

    /// Exchanges the callback code and fetches the profile, which is passed
    /// on untouched.
    pub async fn authenticate(&self, code: &str) -> Result<Authenticated, AuthError> {
        let tokens = self.exchange_code(code).await?;
        let profile = self.fetch_profile(&tokens.access_token).await?;
        Ok(Authenticated { tokens, profile })
    }

    pub async fn exchange_code(&self, code: &str) -> Result<Tokens, AuthError> {
        let url = self.endpoint(&["oauth", "access_token"])?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("client_id", self.config.app_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("client_secret", self.config.app_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let reason = graph_error(response).await;
            warn!("token exchange rejected: {reason}");
            return Err(AuthError::TokenExchange { reason });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange { reason: e.without_url().to_string() })?;

        Ok(Tokens {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_in: body.expires_in,
        })
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AuthError> {
        let url = self.endpoint(&["me"])?;
        let fields = graph_fields();
        let response = self
            .client
            .get(url)
            .query(&[("fields", fields.as_str()), ("access_token", access_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            let reason = graph_error(response).await;
            warn!("profile request rejected: {reason}");
            return Err(AuthError::ProfileFetch { reason });
        }

        let profile: Value = response
            .json()
            .await
            .map_err(|e| AuthError::ProfileFetch { reason: e.without_url().to_string() })?;

        if !profile::is_usable(&profile) {
            return Err(AuthError::UnusableProfile);
        }

        debug!("fetched provider profile");
        Ok(profile)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AuthError> {
        let mut url = self.config.graph_url.clone();
        url.path_segments_mut()
            .map_err(|_| AuthError::Endpoint)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Translates the requested profile fields into Graph API field names.
pub fn graph_fields() -> String {
    PROFILE_FIELDS
        .iter()
        .map(|field| match *field {
            "emails" => "email",
            "name" => "last_name,first_name,middle_name",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(",")
}

async fn graph_error(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<GraphErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => format!("provider responded with {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> FacebookConfig {
        FacebookConfig {
            app_id: "app-1".into(),
            app_secret: "secret".into(),
            callback_url: Url::parse("https://dir.example.com/auth/facebook/callback").unwrap(),
            dialog_url: Url::parse("https://www.facebook.com/v19.0/dialog/oauth").unwrap(),
            graph_url: Url::parse("https://graph.facebook.com/v19.0").unwrap(),
        }
    }

    #[test]
    fn authorize_url_carries_client_and_state() {
        let client = FacebookClient::new(config());
        let url = client.authorize_url("xyz");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("www.facebook.com"));
        assert_eq!(pairs.get("client_id").map(String::as_str), Some("app-1"));
        assert_eq!(
            pairs.get("redirect_uri").map(String::as_str),
            Some("https://dir.example.com/auth/facebook/callback")
        );
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(pairs.get("state").map(String::as_str), Some("xyz"));
        assert!(!pairs.contains_key("client_secret"));
    }

    #[test]
    fn endpoints_extend_the_versioned_base() {
        let client = FacebookClient::new(config());
        assert_eq!(
            client.endpoint(&["oauth", "access_token"]).unwrap().as_str(),
            "https://graph.facebook.com/v19.0/oauth/access_token"
        );
    }

    #[test]
    fn graph_fields_cover_requested_profile() {
        assert_eq!(graph_fields(), "id,email,last_name,first_name,middle_name,picture.type(large)");
    }

    #[test]
    fn states_are_random_alphanumeric() {
        let a = FacebookClient::new_state();
        let b = FacebookClient::new_state();
        assert_eq!(a.len(), STATE_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
