use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{PullRequestId, PullRequestName, UserId, ValidationError};

/// Upper bound on reviewers assigned to a single pull request.
pub const MAX_REVIEWERS: usize = 2;

/// OPEN is the initial state, MERGED is terminal and remembers when the
/// first merge happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestStatus {
    Open,
    Merged { merged_at: DateTime<Utc> },
}

impl PullRequestStatus {
    pub const OPEN: &'static str = "OPEN";
    pub const MERGED: &'static str = "MERGED";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => Self::OPEN,
            Self::Merged { .. } => Self::MERGED,
        }
    }

    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Open => None,
            Self::Merged { merged_at } => Some(*merged_at),
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }

    /// Rebuilds the status from its stored columns.
    pub fn from_parts(
        status: &str,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        match (status, merged_at) {
            (Self::OPEN, None) => Ok(Self::Open),
            (Self::MERGED, Some(merged_at)) => Ok(Self::Merged { merged_at }),
            (status, merged_at) => Err(ValidationError::new(format!(
                "Inconsistent pull request status: {status} (merged_at: {merged_at:?})"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
    /// Sorted by user ID.
    pub assigned_reviewers: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl PullRequest {
    /// A freshly opened pull request. Rejects reviewer lists that include
    /// the author, contain duplicates or exceed `MAX_REVIEWERS`.
    pub fn open(
        id: PullRequestId,
        name: PullRequestName,
        author_id: UserId,
        assigned_reviewers: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::restore(
            id,
            name,
            author_id,
            PullRequestStatus::Open,
            assigned_reviewers,
            created_at,
        )
    }

    pub fn restore(
        id: PullRequestId,
        name: PullRequestName,
        author_id: UserId,
        status: PullRequestStatus,
        mut assigned_reviewers: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_reviewers(&author_id, &assigned_reviewers)?;
        assigned_reviewers.sort();

        Ok(Self {
            id,
            name,
            author_id,
            status,
            assigned_reviewers,
            created_at,
        })
    }

    pub fn is_reviewer(&self, user_id: &UserId) -> bool {
        self.assigned_reviewers.contains(user_id)
    }

    pub fn needs_more_reviewers(&self) -> bool {
        self.assigned_reviewers.len() < MAX_REVIEWERS
    }

    /// Moves the pull request to MERGED. Returns `false` and leaves
    /// `merged_at` untouched when it was already merged.
    pub fn merge(&mut self, merged_at: DateTime<Utc>) -> bool {
        if self.status.is_merged() {
            return false;
        }
        self.status = PullRequestStatus::Merged { merged_at };
        true
    }

    /// Swaps `old` for `new` in the reviewer list, keeping it sorted.
    /// Callers check the lifecycle preconditions first.
    pub(crate) fn swap_reviewer(&mut self, old: &UserId, new: UserId) {
        self.assigned_reviewers.retain(|id| id != old);
        self.assigned_reviewers.push(new);
        self.assigned_reviewers.sort();
    }

    pub fn summary(&self) -> PullRequestShort {
        PullRequestShort {
            id: self.id.clone(),
            name: self.name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

fn validate_reviewers(
    author_id: &UserId,
    reviewers: &[UserId],
) -> Result<(), ValidationError> {
    if reviewers.len() > MAX_REVIEWERS {
        return Err(ValidationError::new(format!(
            "At most {MAX_REVIEWERS} reviewers can be assigned"
        )));
    }
    if reviewers.contains(author_id) {
        return Err(ValidationError::new(
            "Author cannot review their own pull request".to_string(),
        ));
    }
    let unique: HashSet<&UserId> = reviewers.iter().collect();
    if unique.len() != reviewers.len() {
        return Err(ValidationError::new(
            "Reviewer assigned more than once".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestShort {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}
