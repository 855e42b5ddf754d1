use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReviewAPIError, UserId},
    routes::PullRequestShortResponse,
    AppState,
};

#[derive(Deserialize)]
pub struct GetReviewQueryParams {
    #[serde(default)]
    user_id: String,
}

#[tracing::instrument(name = "Get review assignments route handler", skip_all)]
pub async fn get_review(
    State(state): State<AppState>,
    query_params: Query<GetReviewQueryParams>,
) -> Result<Json<ReviewListResponse>, ReviewAPIError> {
    let user_id = UserId::parse(&query_params.user_id)?;
    tracing::debug!("user_id: {user_id}");

    let pull_requests: Vec<PullRequestShortResponse> = state
        .engine
        .list_reviewer_pull_requests(&user_id)
        .await?
        .into_iter()
        .map(PullRequestShortResponse::from)
        .collect();

    Ok(Json(ReviewListResponse {
        user_id: user_id.to_string(),
        pull_requests,
    }))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortResponse>,
}
