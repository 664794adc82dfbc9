//! PostgreSQL participant repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::domain::participant::{
    normalize_email, stale_status, Participant, ParticipantId, ParticipantQuery,
    ParticipantRepository, ParticipantSnapshot, ParticipantStats, ParticipantStatus,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, email, team_size, registration_date, status, created_at, updated_at
    FROM participants
"#;

/// PostgreSQL implementation of ParticipantRepository
///
/// Email uniqueness is enforced by the `idx_participants_email_lower` unique
/// index, so a lost check-then-insert race still surfaces as a Conflict.
#[derive(Debug, Clone)]
pub struct PostgresParticipantRepository {
    pool: PgPool,
}

impl PostgresParticipantRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn status_filter(query: &ParticipantQuery) -> Option<&'static str> {
    query.status.map(|s| s.as_str())
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn create(&self, participant: Participant) -> Result<Participant, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO participants (id, name, email, team_size, registration_date, status,
                                      created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(participant.id().as_uuid())
        .bind(participant.name())
        .bind(participant.email())
        .bind(i16::from(participant.team_size()))
        .bind(participant.registration_date())
        .bind(participant.status().as_str())
        .bind(participant.created_at())
        .bind(participant.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!(
                    "Participant with email '{}' already exists",
                    participant.email()
                ))
            } else {
                DomainError::storage(format!("Failed to create participant: {}", e))
            }
        })?;

        Ok(participant)
    }

    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get participant: {}", e)))?;

        row.as_ref().map(row_to_participant).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE lower(email) = $1", SELECT_COLUMNS))
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to get participant by email: {}", e))
            })?;

        row.as_ref().map(row_to_participant).transpose()
    }

    async fn update(
        &self,
        participant: Participant,
        expected_status: ParticipantStatus,
    ) -> Result<Participant, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET name = $2, team_size = $3, status = $4, updated_at = $5
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(participant.id().as_uuid())
        .bind(participant.name())
        .bind(i16::from(participant.team_size()))
        .bind(participant.status().as_str())
        .bind(participant.updated_at())
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update participant: {}", e)))?;

        if result.rows_affected() == 0 {
            // Either gone or moved on by another writer
            return match self.find_by_id(participant.id()).await? {
                Some(current) => Err(stale_status(expected_status, current.status())),
                None => Err(DomainError::not_found(format!(
                    "Participant '{}' not found",
                    participant.id()
                ))),
            };
        }

        Ok(participant)
    }

    async fn list(&self, query: &ParticipantQuery) -> Result<Vec<Participant>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY registration_date DESC",
            SELECT_COLUMNS
        ))
        .bind(status_filter(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list participants: {}", e)))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn stats(&self, query: &ParticipantQuery) -> Result<ParticipantStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*)::BIGINT AS count,
                   COALESCE(SUM(team_size), 0)::BIGINT AS total_team_size
            FROM participants
            WHERE ($1::TEXT IS NULL OR status = $1)
            "#,
        )
        .bind(status_filter(query))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to aggregate participants: {}", e)))?;

        let count: i64 = row.get("count");
        let total_team_size: i64 = row.get("total_team_size");

        Ok(ParticipantStats {
            count: count.max(0) as u64,
            total_team_size: total_team_size.max(0) as u64,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

fn row_to_participant(row: &sqlx::postgres::PgRow) -> Result<Participant, DomainError> {
    let id: Uuid = row.get("id");
    let team_size: i16 = row.get("team_size");
    let status: String = row.get("status");
    let registration_date: DateTime<Utc> = row.get("registration_date");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let team_size = u8::try_from(team_size).map_err(|_| {
        DomainError::storage(format!("Invalid team size in database: {}", team_size))
    })?;
    let status: ParticipantStatus = status
        .parse()
        .map_err(|e| DomainError::storage(format!("Invalid status in database: {}", e)))?;

    Ok(ParticipantSnapshot {
        id: ParticipantId::from(id),
        name: row.get("name"),
        email: row.get("email"),
        team_size,
        registration_date,
        status,
        created_at,
        updated_at,
    }
    .into())
}
