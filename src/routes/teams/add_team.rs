use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReviewAPIError, Team, TeamMember, TeamName, UserId, Username},
    routes::json_body,
    AppState,
};

#[tracing::instrument(name = "Add team route handler", skip_all)]
pub async fn add_team(
    State(state): State<AppState>,
    request: Result<Json<AddTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamResponse>), ReviewAPIError> {
    let request = json_body(request)?;

    let team_name = TeamName::parse(&request.team_name)?;
    let members = request
        .members
        .iter()
        .map(|member| -> Result<TeamMember, ReviewAPIError> {
            Ok(TeamMember::new(
                UserId::parse(&member.user_id)?,
                Username::parse(&member.username)?,
                member.is_active,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let team = state
        .engine
        .create_team(Team::new(team_name, members))
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

#[derive(Debug, Deserialize)]
pub struct AddTeamRequest {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberRequest>,
}

#[derive(Debug, Deserialize)]
pub struct TeamMemberRequest {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: Team,
}
