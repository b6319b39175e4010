//! Application state management

use crate::auth::SessionConfig;
use agricad_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Application state shared across handlers
///
/// Session identity never lives here; it is decoded from the request
/// token by the route guard and carried in request extensions only.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Session signing configuration
    pub session: SessionConfig,
    /// Credential database pool
    pub db: PgPool,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create new application state with config
    ///
    /// The pool connects lazily; the first credential lookup opens the
    /// first connection.
    pub fn new(config: AppConfig) -> Result<Self, sqlx::Error> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.pool_size)
            .connect_lazy(&config.database.url)?;

        Ok(Self {
            session: SessionConfig::from_auth_config(&config.auth),
            config,
            db,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
