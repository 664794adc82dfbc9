//! Participant entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::ValidRegistration;
use crate::domain::DomainError;

/// Participant identifier, assigned by the store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ParticipantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for ParticipantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::not_found(format!("Participant '{}' not found", s)))
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration status of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Confirmed,
    Cancelled,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a participant in this status may move to `next`
    pub fn can_transition_to(&self, next: ParticipantStatus) -> bool {
        matches!(
            (self, next),
            (Self::Registered, Self::Confirmed)
                | (Self::Registered, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl FromStr for ParticipantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "registered" => Ok(Self::Registered),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::validation(format!(
                "'{}' is not a valid status",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full set of participant fields, used to rebuild a participant from storage
#[derive(Debug, Clone)]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    pub team_size: u8,
    pub registration_date: DateTime<Utc>,
    pub status: ParticipantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    id: ParticipantId,
    name: String,
    /// Always stored lowercased
    email: String,
    team_size: u8,
    registration_date: DateTime<Utc>,
    status: ParticipantStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a newly registered participant from validated input
    pub fn register(registration: ValidRegistration) -> Self {
        let now = Utc::now();

        Self {
            id: ParticipantId::generate(),
            name: registration.name,
            email: registration.email,
            team_size: registration.team_size,
            registration_date: now,
            status: ParticipantStatus::Registered,
            created_at: now,
            updated_at: now,
        }
    }

    /// Override the registration date (builder pattern)
    pub fn with_registration_date(mut self, date: DateTime<Utc>) -> Self {
        self.registration_date = date;
        self
    }

    // Getters

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn team_size(&self) -> u8 {
        self.team_size
    }

    pub fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Confirmation message shown after a successful registration
    pub fn confirmation_message(&self) -> String {
        confirmation_message(&self.name, self.team_size)
    }

    // Mutators

    /// Move the participant to another lifecycle status
    pub fn transition_to(&mut self, next: ParticipantStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(format!(
                "cannot move participant from '{}' to '{}'",
                self.status, next
            )));
        }

        self.status = next;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<ParticipantSnapshot> for Participant {
    fn from(s: ParticipantSnapshot) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            team_size: s.team_size,
            registration_date: s.registration_date,
            status: s.status,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Personalized confirmation for a registered team
pub fn confirmation_message(name: &str, team_size: impl std::fmt::Display) -> String {
    format!("Thank you, {}! Your team of {} is registered.", name, team_size)
}

/// Error for a status write whose starting point was changed by someone else
pub fn stale_status(expected: ParticipantStatus, current: ParticipantStatus) -> DomainError {
    DomainError::invalid_transition(format!(
        "participant status changed from '{}' to '{}' meanwhile",
        expected, current
    ))
}
