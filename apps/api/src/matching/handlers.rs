//! Axum route handlers for the Match API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::models::{CandidateProfile, MatchResult, RequirementProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub cv_data: CandidateProfile,
    pub jd_data: RequirementProfile,
}

/// POST /api/v1/match-score
///
/// Scores a parsed CV against parsed job requirements. A body that does not
/// decode into both records is the only failure this endpoint reports.
pub async fn handle_match_score(
    State(state): State<AppState>,
    payload: Result<Json<MatchScoreRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let request_id = Uuid::new_v4();
    let span = info_span!("match_score", %request_id);
    async move {
        info!(
            "Matching {} skills / {} certifications against {} / {}",
            request.cv_data.skills.len(),
            request.cv_data.certifications.len(),
            request.jd_data.skills.len(),
            request.jd_data.certifications.len()
        );
        let result = state
            .matcher
            .match_profiles(&request.cv_data, &request.jd_data)
            .await;
        Ok(Json(result))
    }
    .instrument(span)
    .await
}
