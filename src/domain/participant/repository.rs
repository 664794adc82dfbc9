//! Participant repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Participant, ParticipantId, ParticipantStatus};
use crate::domain::DomainError;

/// Query parameters for listing and aggregating participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantQuery {
    /// Filter by status, `None` matches every status
    pub status: Option<ParticipantStatus>,
}

impl Default for ParticipantQuery {
    fn default() -> Self {
        Self::registered()
    }
}

impl ParticipantQuery {
    /// Only participants still in the `registered` status
    pub fn registered() -> Self {
        Self {
            status: Some(ParticipantStatus::Registered),
        }
    }

    /// Participants in any status
    pub fn all() -> Self {
        Self { status: None }
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a participant passes the filter
    pub fn matches(&self, participant: &Participant) -> bool {
        self.status.is_none_or(|status| participant.status() == status)
    }
}

/// Aggregate over the participants matching a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticipantStats {
    pub count: u64,
    pub total_team_size: u64,
}

impl ParticipantStats {
    /// Mean team size rounded to one decimal place, 0 when there is no one
    pub fn average_team_size(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        let average = self.total_team_size as f64 / self.count as f64;
        (average * 10.0).round() / 10.0
    }
}

/// Store for participant records
///
/// Implementations must enforce email uniqueness atomically inside `create`:
/// two concurrent registrations with the same email (in any case) can never
/// both succeed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new participant; Conflict if the email is taken
    async fn create(&self, participant: Participant) -> Result<Participant, DomainError>;

    /// Get a participant by ID
    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError>;

    /// Get a participant by email, compared case-insensitively
    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError>;

    /// Persist changes to an existing participant, provided its stored status
    /// is still `expected_status`; InvalidTransition otherwise
    async fn update(
        &self,
        participant: Participant,
        expected_status: ParticipantStatus,
    ) -> Result<Participant, DomainError>;

    /// Participants matching the query, newest registration first
    async fn list(&self, query: &ParticipantQuery) -> Result<Vec<Participant>, DomainError>;

    /// Count and team size total of participants matching the query
    async fn stats(&self, query: &ParticipantQuery) -> Result<ParticipantStats, DomainError>;

    /// Release the underlying backend
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::ValidRegistration;

    #[test]
    fn test_average_team_size() {
        let stats = ParticipantStats {
            count: 3,
            total_team_size: 12,
        };
        assert_eq!(stats.average_team_size(), 4.0);
    }

    #[test]
    fn test_average_team_size_rounds_to_one_decimal() {
        let stats = ParticipantStats {
            count: 3,
            total_team_size: 10,
        };
        assert_eq!(stats.average_team_size(), 3.3);

        let stats = ParticipantStats {
            count: 3,
            total_team_size: 11,
        };
        assert_eq!(stats.average_team_size(), 3.7);
    }

    #[test]
    fn test_average_team_size_empty() {
        assert_eq!(ParticipantStats::default().average_team_size(), 0.0);
    }

    #[test]
    fn test_default_query_is_registered_only() {
        let mut participant = Participant::register(ValidRegistration {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            team_size: 2,
        });

        let query = ParticipantQuery::default();
        assert!(query.matches(&participant));

        participant.transition_to(ParticipantStatus::Confirmed).unwrap();
        assert!(!query.matches(&participant));
        assert!(ParticipantQuery::all().matches(&participant));
        assert!(ParticipantQuery::all()
            .with_status(ParticipantStatus::Confirmed)
            .matches(&participant));
    }
}
