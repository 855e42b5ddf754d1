use std::sync::Arc;

use crate::{
    domain::{PullRequestStore, TeamStore},
    services::ReviewEngine,
    utils::auth::ApiTokens,
};

pub type TeamStoreType = Arc<dyn TeamStore + Send + Sync>;
pub type PullRequestStoreType = Arc<dyn PullRequestStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub engine: ReviewEngine,
    pub api_tokens: ApiTokens,
}

impl AppState {
    pub fn new(
        team_store: TeamStoreType,
        pull_request_store: PullRequestStoreType,
        api_tokens: ApiTokens,
    ) -> Self {
        Self {
            engine: ReviewEngine::new(team_store, pull_request_store),
            api_tokens,
        }
    }
}
