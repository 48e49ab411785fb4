//! Server-side sessions. The stored principal is the provider profile
//! itself: serialization and deserialization are identity over JSON.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::ProviderProfile;

pub const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored session could not be decoded: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub fn serialize_profile(profile: &ProviderProfile) -> Result<String, serde_json::Error> {
    serde_json::to_string(profile)
}

pub fn deserialize_profile(raw: &str) -> Result<ProviderProfile, serde_json::Error> {
    serde_json::from_str(raw)
}

#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, ttl_days: i64) -> Self {
        Self { pool, ttl: Duration::days(ttl_days) }
    }

    /// Stores the profile and returns the new session token.
    pub async fn create(&self, profile: &ProviderProfile) -> Result<String, SessionError> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO sessions (token, profile, created_at, expires_at) VALUES (?, ?, ?, ?)"
        )
        .bind(&token)
        .bind(serialize_profile(profile)?)
        .bind(now.to_rfc3339())
        .bind((now + self.ttl).to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Returns the stored profile. Expired sessions are removed and read as absent.
    pub async fn load(&self, token: &str) -> Result<Option<ProviderProfile>, SessionError> {
        let row = sqlx::query("SELECT profile, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        let expires_at = row.get::<String, _>("expires_at");
        let expired = DateTime::parse_from_rfc3339(&expires_at)
            .map(|t| t.with_timezone(&Utc) <= Utc::now())
            .unwrap_or(true);

        if expired {
            debug!("session expired, removing");
            self.destroy(token).await?;
            return Ok(None);
        }

        let profile = deserialize_profile(&row.get::<String, _>("profile"))?;
        Ok(Some(profile))
    }

    pub async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, SessionError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
