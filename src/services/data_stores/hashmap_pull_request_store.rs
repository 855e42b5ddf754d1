use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use tokio::sync::RwLock;

use crate::domain::{
    rank_reviewers, PullRequest, PullRequestId, PullRequestShort,
    PullRequestStats, PullRequestStore, PullRequestStoreError, ReviewerStats,
    TeamStore, TeamStoreError, UserId,
};

/// Keeps pull requests in memory. User activity and team membership are
/// read from `team_store` while this store's lock is held, always in that
/// order.
pub struct HashmapPullRequestStore {
    pull_requests: RwLock<HashMap<PullRequestId, PullRequest>>,
    team_store: Arc<dyn TeamStore + Send + Sync>,
}

impl HashmapPullRequestStore {
    pub fn new(team_store: Arc<dyn TeamStore + Send + Sync>) -> Self {
        Self {
            pull_requests: RwLock::default(),
            team_store,
        }
    }

    async fn is_available(
        &self,
        old: &UserId,
        new: &UserId,
    ) -> Result<bool, PullRequestStoreError> {
        let old = self.team_store.get_user(old).await;
        let new = self.team_store.get_user(new).await;
        match (old, new) {
            (Ok(old), Ok(new)) => {
                Ok(new.is_active && new.team_name == old.team_name)
            }
            (Err(TeamStoreError::UserNotFound), _)
            | (_, Err(TeamStoreError::UserNotFound)) => Ok(false),
            (Err(e), _) | (_, Err(e)) => {
                Err(PullRequestStoreError::UnexpectedError(eyre!(e)))
            }
        }
    }
}

#[async_trait::async_trait]
impl PullRequestStore for HashmapPullRequestStore {
    async fn add_pull_request(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        match self.pull_requests.write().await.entry(pull_request.id.clone()) {
            Entry::Occupied(_) => Err(PullRequestStoreError::PullRequestExists),
            Entry::Vacant(entry) => {
                entry.insert(pull_request.clone());
                Ok(())
            }
        }
    }

    async fn get_pull_request(
        &self,
        id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        self.pull_requests
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(PullRequestStoreError::PullRequestNotFound)
    }

    async fn merge_pull_request(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<(PullRequest, bool), PullRequestStoreError> {
        let mut pull_requests = self.pull_requests.write().await;
        let pull_request = pull_requests
            .get_mut(id)
            .ok_or(PullRequestStoreError::PullRequestNotFound)?;

        let merged = pull_request.merge(merged_at);
        Ok((pull_request.clone(), merged))
    }

    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        let mut pull_requests = self.pull_requests.write().await;
        let pull_request = pull_requests
            .get_mut(id)
            .ok_or(PullRequestStoreError::PullRequestNotFound)?;

        if pull_request.status.is_merged() {
            return Err(PullRequestStoreError::PullRequestMerged);
        }
        if !pull_request.is_reviewer(old) {
            return Err(PullRequestStoreError::ReviewerNotAssigned);
        }
        if pull_request.is_reviewer(new) || &pull_request.author_id == new {
            return Err(PullRequestStoreError::ReviewerAlreadyAssigned);
        }
        if !self.is_available(old, new).await? {
            return Err(PullRequestStoreError::ReviewerUnavailable);
        }

        pull_request.swap_reviewer(old, new.clone());
        Ok(pull_request.clone())
    }

    async fn get_reviewer_pull_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        let pull_requests = self.pull_requests.read().await;
        let mut reviewed: Vec<&PullRequest> = pull_requests
            .values()
            .filter(|pr| pr.is_reviewer(user_id))
            .collect();

        reviewed.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });
        Ok(reviewed.into_iter().map(PullRequest::summary).collect())
    }

    async fn get_reviewer_stats(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestStoreError> {
        // Holding the read lock keeps new assignments out until the users
        // are read, and every assigned reviewer is already a known user.
        let pull_requests = self.pull_requests.read().await;
        let users = self
            .team_store
            .get_users()
            .await
            .map_err(|e| PullRequestStoreError::UnexpectedError(eyre!(e)))?;

        let mut counts = HashMap::new();
        for pull_request in pull_requests.values() {
            for reviewer in pull_request.assigned_reviewers.iter() {
                *counts.entry(reviewer.clone()).or_insert(0) += 1;
            }
        }
        Ok(rank_reviewers(users, &counts))
    }

    async fn get_pull_request_stats(
        &self,
    ) -> Result<PullRequestStats, PullRequestStoreError> {
        Ok(self.pull_requests.read().await.values().collect())
    }
}
