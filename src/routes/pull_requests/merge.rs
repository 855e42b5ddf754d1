use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::{
    domain::{PullRequestId, ReviewAPIError},
    routes::{json_body, PullRequestEnvelope},
    AppState,
};

#[tracing::instrument(name = "Merge pull request route handler", skip_all)]
pub async fn merge_pull_request(
    State(state): State<AppState>,
    request: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> Result<Json<PullRequestEnvelope>, ReviewAPIError> {
    let request = json_body(request)?;
    let id = PullRequestId::parse(&request.pull_request_id)?;

    let pull_request = state.engine.merge_pull_request(&id).await?;

    Ok(Json(PullRequestEnvelope {
        pr: pull_request.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}
