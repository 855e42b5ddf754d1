use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{PullRequest, User, UserId, Username};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStats {
    pub user_id: UserId,
    pub username: Username,
    pub total_assignments: u64,
}

/// Pairs every known user with their assignment count, ordered by count
/// descending then username ascending. Users without assignments get zero.
pub fn rank_reviewers(
    users: Vec<User>,
    assignment_counts: &HashMap<UserId, u64>,
) -> Vec<ReviewerStats> {
    let mut stats: Vec<ReviewerStats> = users
        .into_iter()
        .map(|user| ReviewerStats {
            total_assignments: assignment_counts
                .get(&user.user_id)
                .copied()
                .unwrap_or(0),
            user_id: user.user_id,
            username: user.username,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.total_assignments
            .cmp(&a.total_assignments)
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestStats {
    pub total_prs: u64,
    pub open_prs: u64,
    pub merged_prs: u64,
    pub prs_with_reviewers: u64,
    pub prs_without_reviewers: u64,
}

impl<'a> FromIterator<&'a PullRequest> for PullRequestStats {
    fn from_iter<I: IntoIterator<Item = &'a PullRequest>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut stats, pr| {
            stats.total_prs += 1;
            if pr.status.is_merged() {
                stats.merged_prs += 1;
            } else {
                stats.open_prs += 1;
            }
            if pr.assigned_reviewers.is_empty() {
                stats.prs_without_reviewers += 1;
            } else {
                stats.prs_with_reviewers += 1;
            }
            stats
        })
    }
}
