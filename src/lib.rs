//! CodeScape registration backend
//!
//! Stores participant sign-ups (name, email, team size) and serves them
//! through a small JSON API:
//! - registration with aggregated validation and case-insensitive email uniqueness
//! - listing and statistics over registered participants
//! - status transitions (registered, confirmed, cancelled)
//!
//! The `client` module models the sign-up page that talks to it.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::time::Duration;

use api::state::AppState;
use infrastructure::participant::RegistrationService;
use infrastructure::rate_limit::RateLimiter;
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Create the application state with custom configuration
///
/// Opens (and for PostgreSQL, migrates) the participant store.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = StorageFactory::create_participant_repository(&config.storage).await?;

    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_secs),
    );

    info!(
        backend = %config.storage.backend,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Application state initialized"
    );

    Ok(AppState::new(RegistrationService::new(repository), rate_limiter))
}
