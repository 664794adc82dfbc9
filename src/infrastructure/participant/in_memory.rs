//! In-memory participant repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::participant::{
    normalize_email, stale_status, Participant, ParticipantId, ParticipantQuery,
    ParticipantRepository, ParticipantStats, ParticipantStatus,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Records {
    participants: HashMap<ParticipantId, Participant>,
    /// Lowercased email -> owner, the uniqueness index
    emails: HashMap<String, ParticipantId>,
}

/// Thread-safe in-memory participant store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Records and the email index live behind one lock, so the uniqueness check
/// and the insert happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryParticipantRepository {
    records: RwLock<Records>,
}

impl InMemoryParticipantRepository {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with participants
    ///
    /// Later entries with an email already present are skipped.
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        let mut records = Records::default();

        for participant in participants {
            let email = normalize_email(participant.email());

            if records.emails.contains_key(&email) {
                continue;
            }

            records.emails.insert(email, *participant.id());
            records.participants.insert(*participant.id(), participant);
        }

        Self {
            records: RwLock::new(records),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn create(&self, participant: Participant) -> Result<Participant, DomainError> {
        let email = normalize_email(participant.email());
        let mut records = self.records.write().map_err(lock_error)?;

        if records.emails.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "Participant with email '{}' already exists",
                email
            )));
        }

        if records.participants.contains_key(participant.id()) {
            return Err(DomainError::conflict(format!(
                "Participant '{}' already exists",
                participant.id()
            )));
        }

        records.emails.insert(email, *participant.id());
        records
            .participants
            .insert(*participant.id(), participant.clone());

        Ok(participant)
    }

    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.participants.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError> {
        let records = self.records.read().map_err(lock_error)?;

        Ok(records
            .emails
            .get(&normalize_email(email))
            .and_then(|id| records.participants.get(id))
            .cloned())
    }

    async fn update(
        &self,
        participant: Participant,
        expected_status: ParticipantStatus,
    ) -> Result<Participant, DomainError> {
        let mut records = self.records.write().map_err(lock_error)?;

        let Some(existing) = records.participants.get(participant.id()) else {
            return Err(DomainError::not_found(format!(
                "Participant '{}' not found",
                participant.id()
            )));
        };

        if existing.status() != expected_status {
            return Err(stale_status(expected_status, existing.status()));
        }

        if existing.email() != participant.email() {
            return Err(DomainError::validation("Email cannot be changed"));
        }

        records
            .participants
            .insert(*participant.id(), participant.clone());

        Ok(participant)
    }

    async fn list(&self, query: &ParticipantQuery) -> Result<Vec<Participant>, DomainError> {
        let records = self.records.read().map_err(lock_error)?;

        let mut result: Vec<Participant> = records
            .participants
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        // Newest registration first
        result.sort_by(|a, b| b.registration_date().cmp(&a.registration_date()));

        Ok(result)
    }

    async fn stats(&self, query: &ParticipantQuery) -> Result<ParticipantStats, DomainError> {
        let records = self.records.read().map_err(lock_error)?;

        Ok(records
            .participants
            .values()
            .filter(|p| query.matches(p))
            .fold(ParticipantStats::default(), |mut acc, p| {
                acc.count += 1;
                acc.total_team_size += u64::from(p.team_size());
                acc
            }))
    }

    async fn close(&self) {}
}
