use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{PullRequestId, ReviewAPIError, UserId},
    routes::{json_body, PullRequestResponse},
    AppState,
};

#[tracing::instrument(name = "Reassign reviewer route handler", skip_all)]
pub async fn reassign_reviewer(
    State(state): State<AppState>,
    request: Result<Json<ReassignRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, ReviewAPIError> {
    let request = json_body(request)?;

    let id = PullRequestId::parse(&request.pull_request_id)?;
    let old_user_id = UserId::parse(&request.old_user_id)?;

    let (pull_request, replaced_by) =
        state.engine.reassign_reviewer(&id, &old_user_id).await?;

    Ok(Json(ReassignResponse {
        pr: pull_request.into(),
        replaced_by: replaced_by.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}
