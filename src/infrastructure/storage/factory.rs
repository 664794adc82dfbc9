//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::info;

use crate::config::StorageSettings;
use crate::domain::participant::ParticipantRepository;
use crate::domain::DomainError;
use crate::infrastructure::participant::{
    InMemoryParticipantRepository, PostgresParticipantRepository,
};

use super::migrations::run_storage_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Factory for creating the participant store
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the participant store described by the settings
    ///
    /// PostgreSQL stores are connected and migrated before being returned.
    pub async fn create_participant_repository(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn ParticipantRepository>, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown storage backend '{}'", settings.backend))
        })?;

        info!("Storage backend: {:?}", storage_type);

        match storage_type {
            StorageType::InMemory => Ok(Arc::new(InMemoryParticipantRepository::new())),
            StorageType::Postgres => {
                let config = PostgresConfig::from(settings);
                let pool = connect_pool(&config).await?;
                run_storage_migrations(&pool).await?;

                Ok(Arc::new(PostgresParticipantRepository::new(pool)))
            }
        }
    }
}
