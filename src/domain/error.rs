use color_eyre::eyre::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthAPIError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Missing token")]
    MissingToken,
}

#[derive(Debug, Error)]
pub enum ReviewAPIError {
    #[error("Team already exists: {0}")]
    TeamExists(String),
    #[error("Team not found: {0}")]
    TeamNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Pull request already exists: {0}")]
    PullRequestExists(String),
    #[error("Pull request not found: {0}")]
    PullRequestNotFound(String),
    #[error("Pull request already merged: {0}")]
    PullRequestMerged(String),
    #[error("User {user_id} is not assigned to pull request {pull_request_id}")]
    NotAssigned {
        pull_request_id: String,
        user_id: String,
    },
    #[error("No active candidates available for pull request {0}")]
    NoCandidate(String),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

impl ReviewAPIError {
    /// Stable machine-readable code returned to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TeamExists(_) => "TEAM_EXISTS",
            Self::PullRequestExists(_) => "PR_EXISTS",
            Self::PullRequestMerged(_) => "PR_MERGED",
            Self::NotAssigned { .. } => "NOT_ASSIGNED",
            Self::NoCandidate(_) => "NO_CANDIDATE",
            Self::TeamNotFound(_)
            | Self::UserNotFound(_)
            | Self::PullRequestNotFound(_) => "NOT_FOUND",
            Self::ValidationError(_) => "INVALID_REQUEST",
            Self::UnexpectedError(_) => "INTERNAL",
        }
    }
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}

#[test]
fn test_error_codes() {
    let cases = [
        (ReviewAPIError::TeamExists("backend".into()), "TEAM_EXISTS"),
        (ReviewAPIError::TeamNotFound("backend".into()), "NOT_FOUND"),
        (ReviewAPIError::UserNotFound("u1".into()), "NOT_FOUND"),
        (ReviewAPIError::PullRequestExists("pr-1".into()), "PR_EXISTS"),
        (ReviewAPIError::PullRequestNotFound("pr-1".into()), "NOT_FOUND"),
        (ReviewAPIError::PullRequestMerged("pr-1".into()), "PR_MERGED"),
        (
            ReviewAPIError::NotAssigned {
                pull_request_id: "pr-1".into(),
                user_id: "u1".into(),
            },
            "NOT_ASSIGNED",
        ),
        (ReviewAPIError::NoCandidate("pr-1".into()), "NO_CANDIDATE"),
    ];

    for (error, expected) in cases.iter() {
        assert_eq!(error.code(), *expected, "Wrong code for {error}");
    }
}
