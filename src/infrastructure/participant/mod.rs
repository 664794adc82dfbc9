//! Participant infrastructure - store implementations and the registration service

mod in_memory;
mod postgres_repository;
mod service;

pub use in_memory::InMemoryParticipantRepository;
pub use postgres_repository::PostgresParticipantRepository;
pub use service::{RegistrationService, DUPLICATE_EMAIL_MESSAGE, PARTICIPANT_NOT_FOUND_MESSAGE};
