use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReviewAPIError, ReviewerStats},
    AppState,
};

#[tracing::instrument(name = "Reviewer stats route handler", skip_all)]
pub async fn reviewer_stats(
    State(state): State<AppState>,
) -> Result<Json<ReviewerStatsResponse>, ReviewAPIError> {
    let reviewers = state.engine.get_reviewer_stats().await?;
    Ok(Json(ReviewerStatsResponse { reviewers }))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStatsResponse {
    pub reviewers: Vec<ReviewerStats>,
}
