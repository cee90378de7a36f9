//! Shared state handed to every handler through axum's `State` extractor

use crate::auth::JwtService;
use crate::config::AppConfig;
use chrono::{FixedOffset, Offset, Utc};
use sqlx::PgPool;
use std::sync::Arc;

/// Pool, configuration and token service; every field clones in O(1)
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtService,
}

impl AppState {
    /// Builds the token keys from the configured secret, so call it once at startup
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Day-boundary offset for requests that do not send `tz_offset_minutes`
    pub fn default_offset(&self) -> FixedOffset {
        fittrack_shared::validation::fixed_offset(self.config.dashboard.default_utc_offset_minutes)
            .unwrap_or_else(|_| Utc.fix())
    }
}
