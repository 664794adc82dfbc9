//! Registration statistics endpoint

use axum::extract::State;
use serde::Serialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::domain::participant::ParticipantStats;

/// Aggregates over registered participants
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_participants: u64,
    pub total_team_members: u64,
    pub average_team_size: f64,
}

impl From<ParticipantStats> for StatsResponse {
    fn from(stats: ParticipantStats) -> Self {
        Self {
            total_participants: stats.count,
            total_team_members: stats.total_team_size,
            average_team_size: stats.average_team_size(),
        }
    }
}

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<Envelope<StatsResponse>>, ApiError> {
    debug!("Computing registration statistics");

    let stats = state
        .registration_service
        .stats()
        .await
        .map_err(|e| ApiError::from_domain(e, "Error fetching statistics"))?;

    Ok(Json(Envelope::data(StatsResponse::from(stats))))
}
