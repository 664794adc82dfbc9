//! Application state for shared services

use std::sync::Arc;

use crate::domain::participant::ParticipantRepository;
use crate::infrastructure::participant::RegistrationService;
use crate::infrastructure::rate_limit::RateLimiter;

/// Application state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub registration_service: Arc<RegistrationService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(registration_service: RegistrationService, rate_limiter: RateLimiter) -> Self {
        Self {
            registration_service: Arc::new(registration_service),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// State over a store with the default rate limit
    pub fn with_repository(repository: Arc<dyn ParticipantRepository>) -> Self {
        Self::new(RegistrationService::new(repository), RateLimiter::default())
    }
}
