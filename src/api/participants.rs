//! Participant registration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json, JsonOrForm};
use crate::domain::participant::{
    Participant, ParticipantId, ParticipantStatus, RegistrationInput,
};

/// Public view of a participant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    pub team_size: u8,
    pub registration_date: DateTime<Utc>,
}

impl From<&Participant> for ParticipantResponse {
    fn from(participant: &Participant) -> Self {
        Self {
            id: *participant.id(),
            name: participant.name().to_string(),
            email: participant.email().to_string(),
            team_size: participant.team_size(),
            registration_date: participant.registration_date(),
        }
    }
}

/// Participant view including its lifecycle status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatusResponse {
    #[serde(flatten)]
    pub participant: ParticipantResponse,
    pub status: ParticipantStatus,
}

/// Body of a status change
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// GET /api/participants
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ParticipantResponse>>>, ApiError> {
    debug!("Listing registered participants");

    let participants = state
        .registration_service
        .list()
        .await
        .map_err(|e| ApiError::from_domain(e, "Error fetching participants"))?;

    let data: Vec<ParticipantResponse> =
        participants.iter().map(ParticipantResponse::from).collect();
    let count = data.len();

    Ok(Json(Envelope::data(data).with_count(count)))
}

/// POST /api/participants
pub async fn register_participant(
    State(state): State<AppState>,
    JsonOrForm(input): JsonOrForm<RegistrationInput>,
) -> Result<(StatusCode, Json<Envelope<ParticipantResponse>>), ApiError> {
    let participant = state
        .registration_service
        .register(input)
        .await
        .map_err(|e| ApiError::from_domain(e, "Registration failed. Please try again."))?;

    let envelope = Envelope::data(ParticipantResponse::from(&participant))
        .with_message(participant.confirmation_message());

    Ok((StatusCode::CREATED, Json(envelope)))
}

/// PATCH /api/participants/{id}/status
pub async fn update_participant_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Envelope<ParticipantStatusResponse>>, ApiError> {
    debug!(id = %id, status = %request.status, "Changing participant status");

    let status: ParticipantStatus = request.status.parse().map_err(ApiError::from)?;

    let participant = state
        .registration_service
        .set_status(&id, status)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(Envelope::data(ParticipantStatusResponse {
        participant: ParticipantResponse::from(&participant),
        status: participant.status(),
    })))
}
