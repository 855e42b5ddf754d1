use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReviewAPIError, User, UserId},
    routes::json_body,
    AppState,
};

#[tracing::instrument(name = "Set user activity route handler", skip_all)]
pub async fn set_is_active(
    State(state): State<AppState>,
    request: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ReviewAPIError> {
    let request = json_body(request)?;
    let user_id = UserId::parse(&request.user_id)?;

    let user = state
        .engine
        .set_user_activity(&user_id, request.is_active)
        .await?;

    Ok(Json(UserResponse { user }))
}

#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}
