use std::collections::HashSet;

use chrono::{SubsecRound, Utc};
use color_eyre::eyre::eyre;

use crate::{
    app_state::{PullRequestStoreType, TeamStoreType},
    domain::{
        select_reviewers, PullRequest, PullRequestId,
        PullRequestName, PullRequestShort, PullRequestStats,
        PullRequestStoreError, ReviewAPIError, ReviewerStats, Team,
        TeamName, TeamStoreError, User, UserId, ValidationError,
        MAX_REVIEWERS,
    },
};

/// Attempts at finding a replacement reviewer when a concurrent change
/// assigns the chosen candidate first.
const MAX_REASSIGN_ATTEMPTS: usize = 3;

/// Team and pull-request lifecycle operations.
///
/// Every operation re-reads what it needs from the stores; nothing is
/// cached between calls. Multi-row writes are delegated to a single store
/// call so they are applied atomically.
#[derive(Clone)]
pub struct ReviewEngine {
    team_store: TeamStoreType,
    pull_request_store: PullRequestStoreType,
}

impl ReviewEngine {
    pub fn new(
        team_store: TeamStoreType,
        pull_request_store: PullRequestStoreType,
    ) -> Self {
        Self {
            team_store,
            pull_request_store,
        }
    }

    /// Creates the team and upserts its members. Members that already exist
    /// are moved into this team with the supplied username and activity.
    #[tracing::instrument(name = "Create team", skip_all)]
    pub async fn create_team(&self, team: Team) -> Result<Team, ReviewAPIError> {
        if team.members.is_empty() {
            return Err(ValidationError::new(
                "Team must have at least one member".to_owned(),
            )
            .into());
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) =
            team.members.iter().find(|m| !seen.insert(&m.user_id))
        {
            return Err(ValidationError::new(format!(
                "Duplicate user ID in members: {}",
                duplicate.user_id
            ))
            .into());
        }

        self.team_store
            .add_team(&team)
            .await
            .map_err(|e| team_error(e, &team.team_name))?;

        let created = self.get_team(&team.team_name).await?;
        tracing::info!(
            "created team {} with {} members",
            created.team_name,
            created.members.len()
        );
        Ok(created)
    }

    #[tracing::instrument(name = "Get team", skip_all)]
    pub async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, ReviewAPIError> {
        self.team_store
            .get_team(team_name)
            .await
            .map_err(|e| team_error(e, team_name))
    }

    #[tracing::instrument(name = "Set user activity", skip_all)]
    pub async fn set_user_activity(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<User, ReviewAPIError> {
        let user = self
            .team_store
            .set_user_activity(user_id, is_active)
            .await
            .map_err(|e| user_error(e, user_id))?;

        tracing::info!("set user {user_id} is_active={is_active}");
        Ok(user)
    }

    /// Opens a pull request and assigns up to two active reviewers from the
    /// author's team. A team with no other active member yields none.
    #[tracing::instrument(name = "Create pull request", skip_all)]
    pub async fn create_pull_request(
        &self,
        id: PullRequestId,
        name: PullRequestName,
        author_id: UserId,
    ) -> Result<PullRequest, ReviewAPIError> {
        let author = self
            .team_store
            .get_user(&author_id)
            .await
            .map_err(|e| user_error(e, &author_id))?;
        let team = self.get_team(&author.team_name).await?;

        let exclude = HashSet::from([author_id.clone()]);
        let reviewers = select_reviewers(
            &team,
            &exclude,
            MAX_REVIEWERS,
            &mut rand::thread_rng(),
        );

        let pull_request = PullRequest::open(
            id,
            name,
            author_id,
            reviewers,
            now(),
        )?;

        self.pull_request_store
            .add_pull_request(&pull_request)
            .await
            .map_err(|e| pull_request_error(e, &pull_request.id, None))?;

        if pull_request.needs_more_reviewers() {
            tracing::debug!(
                "team {} has too few active members for {MAX_REVIEWERS} reviewers",
                team.team_name
            );
        }
        tracing::info!(
            "created pull request {} with {} reviewers",
            pull_request.id,
            pull_request.assigned_reviewers.len()
        );
        Ok(pull_request)
    }

    #[tracing::instrument(name = "Get pull request", skip_all)]
    pub async fn get_pull_request(
        &self,
        id: &PullRequestId,
    ) -> Result<PullRequest, ReviewAPIError> {
        self.pull_request_store
            .get_pull_request(id)
            .await
            .map_err(|e| pull_request_error(e, id, None))
    }

    /// Idempotent: merging a merged pull request returns it unchanged.
    #[tracing::instrument(name = "Merge pull request", skip_all)]
    pub async fn merge_pull_request(
        &self,
        id: &PullRequestId,
    ) -> Result<PullRequest, ReviewAPIError> {
        let (pull_request, merged) = self
            .pull_request_store
            .merge_pull_request(id, now())
            .await
            .map_err(|e| pull_request_error(e, id, None))?;

        if merged {
            tracing::info!("pull request {id} is merged");
        } else {
            tracing::debug!("pull request {id} was already merged");
        }
        Ok(pull_request)
    }

    /// Replaces `old_reviewer_id` with a random active member of the old
    /// reviewer's team who is neither the author nor already assigned.
    /// Returns the updated pull request and the new reviewer.
    #[tracing::instrument(name = "Reassign reviewer", skip_all)]
    pub async fn reassign_reviewer(
        &self,
        id: &PullRequestId,
        old_reviewer_id: &UserId,
    ) -> Result<(PullRequest, UserId), ReviewAPIError> {
        for attempt in 1..=MAX_REASSIGN_ATTEMPTS {
            let pull_request = self.get_pull_request(id).await?;
            if pull_request.status.is_merged() {
                return Err(ReviewAPIError::PullRequestMerged(id.to_string()));
            }
            if !pull_request.is_reviewer(old_reviewer_id) {
                return Err(not_assigned(id, old_reviewer_id));
            }

            let old_reviewer = self
                .team_store
                .get_user(old_reviewer_id)
                .await
                .map_err(|e| user_error(e, old_reviewer_id))?;
            let team = self.get_team(&old_reviewer.team_name).await?;

            let mut exclude: HashSet<UserId> =
                pull_request.assigned_reviewers.iter().cloned().collect();
            exclude.insert(pull_request.author_id.clone());
            exclude.insert(old_reviewer_id.clone());

            let Some(replacement) = select_reviewers(
                &team,
                &exclude,
                1,
                &mut rand::thread_rng(),
            )
            .pop() else {
                return Err(ReviewAPIError::NoCandidate(id.to_string()));
            };

            match self
                .pull_request_store
                .replace_reviewer(id, old_reviewer_id, &replacement)
                .await
            {
                Ok(updated) => {
                    tracing::info!(
                        "replaced reviewer {old_reviewer_id} with {replacement} on pull request {id}"
                    );
                    return Ok((updated, replacement));
                }
                Err(
                    e @ (PullRequestStoreError::ReviewerAlreadyAssigned
                    | PullRequestStoreError::ReviewerUnavailable),
                ) => {
                    tracing::debug!(
                        "candidate {replacement} rejected on attempt {attempt}: {e}"
                    );
                }
                Err(e) => {
                    return Err(pull_request_error(e, id, Some(old_reviewer_id)))
                }
            }
        }

        Err(ReviewAPIError::NoCandidate(id.to_string()))
    }

    /// Pull requests the user reviews, newest first. Unknown users simply
    /// have none.
    #[tracing::instrument(name = "List reviewer pull requests", skip_all)]
    pub async fn list_reviewer_pull_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, ReviewAPIError> {
        let pull_requests = self
            .pull_request_store
            .get_reviewer_pull_requests(user_id)
            .await
            .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;

        tracing::debug!(
            "found {} pull requests for reviewer {user_id}",
            pull_requests.len()
        );
        Ok(pull_requests)
    }

    /// Every known user with their assignment count, busiest first, read
    /// as one snapshot.
    #[tracing::instrument(name = "Get reviewer stats", skip_all)]
    pub async fn get_reviewer_stats(
        &self,
    ) -> Result<Vec<ReviewerStats>, ReviewAPIError> {
        self.pull_request_store
            .get_reviewer_stats()
            .await
            .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(name = "Get pull request stats", skip_all)]
    pub async fn get_pull_request_stats(
        &self,
    ) -> Result<PullRequestStats, ReviewAPIError> {
        let stats = self
            .pull_request_store
            .get_pull_request_stats()
            .await
            .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;

        tracing::debug!(
            "total={} open={} merged={}",
            stats.total_prs,
            stats.open_prs,
            stats.merged_prs
        );
        Ok(stats)
    }
}

// Timestamps are stored with microsecond precision.
fn now() -> chrono::DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn not_assigned(id: &PullRequestId, user_id: &UserId) -> ReviewAPIError {
    ReviewAPIError::NotAssigned {
        pull_request_id: id.to_string(),
        user_id: user_id.to_string(),
    }
}

fn team_error(e: TeamStoreError, team_name: &TeamName) -> ReviewAPIError {
    match e {
        TeamStoreError::TeamExists => {
            ReviewAPIError::TeamExists(team_name.to_string())
        }
        TeamStoreError::TeamNotFound => {
            ReviewAPIError::TeamNotFound(team_name.to_string())
        }
        e => ReviewAPIError::UnexpectedError(eyre!(e)),
    }
}

fn user_error(e: TeamStoreError, user_id: &UserId) -> ReviewAPIError {
    match e {
        TeamStoreError::UserNotFound => {
            ReviewAPIError::UserNotFound(user_id.to_string())
        }
        e => ReviewAPIError::UnexpectedError(eyre!(e)),
    }
}

fn pull_request_error(
    e: PullRequestStoreError,
    id: &PullRequestId,
    reviewer_id: Option<&UserId>,
) -> ReviewAPIError {
    match (e, reviewer_id) {
        (PullRequestStoreError::PullRequestExists, _) => {
            ReviewAPIError::PullRequestExists(id.to_string())
        }
        (PullRequestStoreError::PullRequestNotFound, _) => {
            ReviewAPIError::PullRequestNotFound(id.to_string())
        }
        (PullRequestStoreError::PullRequestMerged, _) => {
            ReviewAPIError::PullRequestMerged(id.to_string())
        }
        (PullRequestStoreError::ReviewerNotAssigned, Some(user_id)) => {
            not_assigned(id, user_id)
        }
        (e, _) => ReviewAPIError::UnexpectedError(eyre!(e)),
    }
}
