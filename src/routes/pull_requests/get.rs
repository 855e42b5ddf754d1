use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    domain::{PullRequestId, ReviewAPIError},
    routes::PullRequestEnvelope,
    AppState,
};

#[derive(Deserialize)]
pub struct GetPullRequestQueryParams {
    #[serde(default)]
    pull_request_id: String,
}

#[tracing::instrument(name = "Get pull request route handler", skip_all)]
pub async fn get_pull_request(
    State(state): State<AppState>,
    query_params: Query<GetPullRequestQueryParams>,
) -> Result<Json<PullRequestEnvelope>, ReviewAPIError> {
    let id = PullRequestId::parse(&query_params.pull_request_id)?;
    let pull_request = state.engine.get_pull_request(&id).await?;

    Ok(Json(PullRequestEnvelope {
        pr: pull_request.into(),
    }))
}
