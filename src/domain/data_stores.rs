use chrono::{DateTime, Utc};
use color_eyre::eyre::Report;
use thiserror::Error;

use super::{
    PullRequest, PullRequestId, PullRequestShort, PullRequestStats,
    ReviewerStats, Team, TeamName, User, UserId,
};

/// Owns teams and users.
#[async_trait::async_trait]
pub trait TeamStore {
    /// Creates the team and upserts every member in one atomic step. A
    /// member whose ID already exists has its username, activity and team
    /// overwritten, which moves them out of their previous team.
    async fn add_team(&self, team: &Team) -> Result<(), TeamStoreError>;
    async fn get_team(&self, team_name: &TeamName)
        -> Result<Team, TeamStoreError>;
    async fn get_user(&self, user_id: &UserId) -> Result<User, TeamStoreError>;
    async fn get_users(&self) -> Result<Vec<User>, TeamStoreError>;
    async fn set_user_activity(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<User, TeamStoreError>;
}

#[derive(Debug, Error)]
pub enum TeamStoreError {
    #[error("Team already exists")]
    TeamExists,
    #[error("Team not found")]
    TeamNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for TeamStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TeamExists, Self::TeamExists)
                | (Self::TeamNotFound, Self::TeamNotFound)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Owns pull requests and their reviewer assignments.
#[async_trait::async_trait]
pub trait PullRequestStore {
    /// Inserts the pull request together with its reviewer assignments.
    /// A duplicate ID is reported as `PullRequestExists`.
    async fn add_pull_request(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError>;
    async fn get_pull_request(
        &self,
        id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError>;
    /// OPEN -> MERGED. Already merged pull requests are returned unchanged.
    /// The flag is `true` only when this call performed the transition.
    async fn merge_pull_request(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<(PullRequest, bool), PullRequestStoreError>;
    /// Atomically replaces `old` with `new`, re-checking under the pull
    /// request's lock that it is still open, that `old` is still assigned
    /// and that `new` is not. `new` must also still be active and share
    /// `old`'s team, otherwise `ReviewerUnavailable` is returned.
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestStoreError>;
    /// Pull requests the user reviews, newest first.
    async fn get_reviewer_pull_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError>;
    /// Every known user with their assignment count, ranked busiest first,
    /// taken from a single consistent read.
    async fn get_reviewer_stats(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestStoreError>;
    async fn get_pull_request_stats(
        &self,
    ) -> Result<PullRequestStats, PullRequestStoreError>;
}

#[derive(Debug, Error)]
pub enum PullRequestStoreError {
    #[error("Pull request already exists")]
    PullRequestExists,
    #[error("Pull request not found")]
    PullRequestNotFound,
    #[error("Pull request already merged")]
    PullRequestMerged,
    #[error("Reviewer is not assigned")]
    ReviewerNotAssigned,
    #[error("Reviewer is already assigned")]
    ReviewerAlreadyAssigned,
    #[error("Reviewer is inactive or outside the team")]
    ReviewerUnavailable,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for PullRequestStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::PullRequestExists, Self::PullRequestExists)
                | (Self::PullRequestNotFound, Self::PullRequestNotFound)
                | (Self::PullRequestMerged, Self::PullRequestMerged)
                | (Self::ReviewerNotAssigned, Self::ReviewerNotAssigned)
                | (
                    Self::ReviewerAlreadyAssigned,
                    Self::ReviewerAlreadyAssigned
                )
                | (Self::ReviewerUnavailable, Self::ReviewerUnavailable)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
