use sqlx::SqlitePool;

use crate::config::Config;
use crate::services::facebook::FacebookClient;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: SessionStore,
    pub facebook: FacebookClient,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            sessions: SessionStore::new(pool.clone(), config.session_ttl_days),
            facebook: FacebookClient::new(config.facebook.clone()),
            pool,
            config,
        }
    }
}
