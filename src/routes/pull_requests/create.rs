use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    domain::{PullRequestId, PullRequestName, ReviewAPIError, UserId},
    routes::{json_body, PullRequestEnvelope},
    AppState,
};

#[tracing::instrument(name = "Create pull request route handler", skip_all)]
pub async fn create_pull_request(
    State(state): State<AppState>,
    request: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestEnvelope>), ReviewAPIError> {
    let request = json_body(request)?;

    let id = PullRequestId::parse(&request.pull_request_id)?;
    let name = PullRequestName::parse(&request.pull_request_name)?;
    let author_id = UserId::parse(&request.author_id)?;

    let pull_request = state
        .engine
        .create_pull_request(id, name, author_id)
        .await?;

    let response = Json(PullRequestEnvelope {
        pr: pull_request.into(),
    });
    Ok((StatusCode::CREATED, response))
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}
