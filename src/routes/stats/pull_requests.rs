use axum::{extract::State, Json};

use crate::{
    domain::{PullRequestStats, ReviewAPIError},
    AppState,
};

#[tracing::instrument(name = "Pull request stats route handler", skip_all)]
pub async fn pull_request_stats(
    State(state): State<AppState>,
) -> Result<Json<PullRequestStats>, ReviewAPIError> {
    let stats = state.engine.get_pull_request_stats().await?;
    Ok(Json(stats))
}
