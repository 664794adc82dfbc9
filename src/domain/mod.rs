//! Domain layer - Core business logic and entities

pub mod error;
pub mod participant;

pub use error::DomainError;
pub use participant::{
    Participant, ParticipantId, ParticipantQuery, ParticipantRepository, ParticipantStats,
    ParticipantStatus, RegistrationInput,
};
