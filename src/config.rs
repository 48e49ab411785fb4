use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::info;
use url::Url;

pub const DEFAULT_DIALOG_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

pub const SESSION_TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {key} is required")]
    Missing { key: &'static str },

    #[error("environment variable {key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct FacebookConfig {
    pub app_id: String,
    pub app_secret: String,
    pub callback_url: Url,
    pub dialog_url: Url,
    pub graph_url: Url,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for FacebookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookConfig")
            .field("app_id", &self.app_id)
            .field("callback_url", &self.callback_url.as_str())
            .field("dialog_url", &self.dialog_url.as_str())
            .field("graph_url", &self.graph_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub client_url: String,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
    pub facebook: FacebookConfig,
}

impl Config {
    /// Reads the process environment. Missing OAuth settings abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let facebook = FacebookConfig {
            app_id: required(&lookup, "FACEBOOK_APP_ID")?,
            app_secret: required(&lookup, "FACEBOOK_APP_SECRET")?,
            callback_url: parse_url("FACEBOOK_CALLBACK_URL", &required(&lookup, "FACEBOOK_CALLBACK_URL")?)?,
            dialog_url: parse_url(
                "FACEBOOK_DIALOG_URL",
                &or_default(&lookup, "FACEBOOK_DIALOG_URL", DEFAULT_DIALOG_URL),
            )?,
            graph_url: parse_url(
                "FACEBOOK_GRAPH_URL",
                &or_default(&lookup, "FACEBOOK_GRAPH_URL", DEFAULT_GRAPH_URL),
            )?,
        };

        Ok(Config {
            port: parsed(&lookup, "PORT", "8080")?,
            database_url: or_default(&lookup, "DATABASE_URL", "sqlite://app.db"),
            client_url: or_default(&lookup, "CLIENT_URL", "http://localhost:3000"),
            session_ttl_days: session_ttl_days(&lookup)?,
            cookie_secure: parsed(&lookup, "COOKIE_SECURE", "false")?,
            facebook,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing { key })
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    or_default(lookup, key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid { key, reason: e.to_string() })
}

fn session_ttl_days<F>(lookup: &F) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let days: i64 = parsed(lookup, "SESSION_TTL_DAYS", "30")?;
    if SESSION_TTL_DAYS_RANGE.contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::Invalid {
            key: "SESSION_TTL_DAYS",
            reason: format!(
                "{days} is outside {}..={}",
                SESSION_TTL_DAYS_RANGE.start(),
                SESSION_TTL_DAYS_RANGE.end()
            ),
        })
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Invalid { key, reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const OAUTH: [(&str, &str); 3] = [
        ("FACEBOOK_APP_ID", "1234"),
        ("FACEBOOK_APP_SECRET", "shh"),
        ("FACEBOOK_CALLBACK_URL", "http://localhost:8080/auth/facebook/callback"),
    ];

    #[test]
    fn defaults_fill_optional_values() {
        let config = Config::from_lookup(lookup(&OAUTH)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite://app.db");
        assert_eq!(config.session_ttl_days, 30);
        assert!(!config.cookie_secure);
        assert_eq!(config.facebook.graph_url.as_str(), "https://graph.facebook.com/v19.0");
    }

    #[test]
    fn each_oauth_value_is_required() {
        for (missing, _) in OAUTH {
            let pairs: Vec<(&str, &str)> = OAUTH.iter().copied().filter(|(k, _)| *k != missing).collect();
            match Config::from_lookup(lookup(&pairs)) {
                Err(ConfigError::Missing { key }) => assert_eq!(key, missing),
                other => panic!("expected missing {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let mut pairs = OAUTH.to_vec();
        pairs[1] = ("FACEBOOK_APP_SECRET", "  ");
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Missing { key: "FACEBOOK_APP_SECRET" })
        ));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let mut pairs = OAUTH.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));

        let mut pairs = OAUTH.to_vec();
        pairs[2] = ("FACEBOOK_CALLBACK_URL", "/relative/callback");
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "FACEBOOK_CALLBACK_URL", .. })
        ));
    }

    #[test]
    fn session_ttl_must_be_in_range() {
        for days in ["0", "-5", "3651", "400000000000000"] {
            let mut pairs = OAUTH.to_vec();
            pairs.push(("SESSION_TTL_DAYS", days));
            assert!(
                matches!(
                    Config::from_lookup(lookup(&pairs)),
                    Err(ConfigError::Invalid { key: "SESSION_TTL_DAYS", .. })
                ),
                "{days} should be rejected"
            );
        }

        for days in ["1", "3650"] {
            let mut pairs = OAUTH.to_vec();
            pairs.push(("SESSION_TTL_DAYS", days));
            let config = Config::from_lookup(lookup(&pairs)).unwrap();
            assert_eq!(config.session_ttl_days.to_string(), days);
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = Config::from_lookup(lookup(&OAUTH)).unwrap();
        assert!(!format!("{config:?}").contains("shh"));
    }
}
