//! Registration service: the workflow behind the participant endpoints

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::participant::{
    validate_registration, Participant, ParticipantId, ParticipantQuery, ParticipantRepository,
    ParticipantStats, ParticipantStatus, RegistrationInput,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_registration, RegistrationOutcome};

/// User-facing message for an email that is already taken
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered!";

/// User-facing message for an unknown participant
pub const PARTICIPANT_NOT_FOUND_MESSAGE: &str = "Participant not found";

/// Registration service over a participant store
#[derive(Debug, Clone)]
pub struct RegistrationService {
    repository: Arc<dyn ParticipantRepository>,
}

impl RegistrationService {
    /// Create a new registration service
    pub fn new(repository: Arc<dyn ParticipantRepository>) -> Self {
        Self { repository }
    }

    /// Validate and persist a new registration
    ///
    /// The email lookup only gives a friendly early answer. The store's own
    /// uniqueness guard decides races, and its Conflict gets the same message.
    pub async fn register(&self, input: RegistrationInput) -> Result<Participant, DomainError> {
        let registration = match validate_registration(&input) {
            Ok(registration) => registration,
            Err(errors) => {
                debug!(count = errors.len(), "Registration rejected by validation");
                record_registration(RegistrationOutcome::Invalid);
                return Err(DomainError::validation_all(
                    errors.iter().map(ToString::to_string),
                ));
            }
        };

        info!(email = %registration.email, team_size = registration.team_size, "Registering participant");

        let existing = self
            .repository
            .find_by_email(&registration.email)
            .await
            .inspect_err(|_| record_registration(RegistrationOutcome::Failed))?;

        if existing.is_some() {
            record_registration(RegistrationOutcome::Duplicate);
            return Err(DomainError::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        match self.repository.create(Participant::register(registration)).await {
            Ok(participant) => {
                record_registration(RegistrationOutcome::Created);
                info!(id = %participant.id(), "Participant registered");
                Ok(participant)
            }
            Err(DomainError::Conflict { message }) => {
                warn!(%message, "Lost registration race on email");
                record_registration(RegistrationOutcome::Duplicate);
                Err(DomainError::conflict(DUPLICATE_EMAIL_MESSAGE))
            }
            Err(e) => {
                record_registration(RegistrationOutcome::Failed);
                Err(e)
            }
        }
    }

    /// Registered participants, newest first
    pub async fn list(&self) -> Result<Vec<Participant>, DomainError> {
        self.repository.list(&ParticipantQuery::registered()).await
    }

    /// Count and team size totals over registered participants
    pub async fn stats(&self) -> Result<ParticipantStats, DomainError> {
        self.repository.stats(&ParticipantQuery::registered()).await
    }

    /// Move a participant to another lifecycle status
    pub async fn set_status(
        &self,
        id: &str,
        status: ParticipantStatus,
    ) -> Result<Participant, DomainError> {
        info!(id = %id, status = %status, "Updating participant status");

        let participant_id: ParticipantId = id
            .parse()
            .map_err(|_| DomainError::not_found(PARTICIPANT_NOT_FOUND_MESSAGE))?;

        let mut participant = self
            .repository
            .find_by_id(&participant_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PARTICIPANT_NOT_FOUND_MESSAGE))?;

        let from = participant.status();
        participant.transition_to(status)?;
        self.repository.update(participant, from).await
    }

    /// Release the underlying store
    pub async fn close(&self) {
        self.repository.close().await;
    }
}
