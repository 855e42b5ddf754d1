use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    domain::{ReviewAPIError, Team, TeamName},
    AppState,
};

#[derive(Deserialize)]
pub struct GetTeamQueryParams {
    #[serde(default)]
    team_name: String,
}

#[tracing::instrument(name = "Get team route handler", skip_all)]
pub async fn get_team(
    State(state): State<AppState>,
    query_params: Query<GetTeamQueryParams>,
) -> Result<Json<Team>, ReviewAPIError> {
    let team_name = TeamName::parse(&query_params.team_name)?;
    tracing::debug!("team_name: {team_name}");

    let team = state.engine.get_team(&team_name).await?;
    Ok(Json(team))
}
