//! Participant domain module
//!
//! A participant is one sign-up for the event: a contact name and email plus
//! the size of the team they bring.

mod entity;
mod repository;
mod validation;

pub use entity::{
    confirmation_message, stale_status, Participant, ParticipantId, ParticipantSnapshot,
    ParticipantStatus,
};
pub use repository::{ParticipantQuery, ParticipantRepository, ParticipantStats};
pub use validation::{
    is_valid_email, normalize_email, parse_leading_int, validate_name, validate_registration,
    validate_team_size, ParticipantValidationError, RegistrationInput, TeamSizeInput,
    ValidRegistration, MAX_NAME_LENGTH, MAX_TEAM_SIZE, MIN_TEAM_SIZE,
};

#[cfg(test)]
pub use repository::MockParticipantRepository;
