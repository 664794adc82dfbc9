//! PostgreSQL connection pooling

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::StorageSettings;
use crate::domain::DomainError;

/// Pool settings for the participant database
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a free connection before failing the query
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        StorageSettings::default().into()
    }
}

impl From<&StorageSettings> for PostgresConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections.max(1),
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl From<StorageSettings> for PostgresConfig {
    fn from(settings: StorageSettings) -> Self {
        Self::from(&settings)
    }
}

impl PostgresConfig {
    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }

    /// Host and database part of the URL, credentials stripped
    pub fn display_target(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);

        without_scheme
            .rsplit_once('@')
            .map_or(without_scheme, |(_, target)| target)
    }
}

/// Open a connection pool for the given configuration
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            DomainError::storage(format!(
                "Failed to connect to PostgreSQL at {}: {}",
                config.display_target(),
                e
            ))
        })?;

    info!(
        target_db = config.display_target(),
        max_connections = config.max_connections,
        "PostgreSQL pool ready"
    );

    Ok(pool)
}
