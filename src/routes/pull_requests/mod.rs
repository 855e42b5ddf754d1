use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PullRequest, PullRequestShort};

mod create;
mod get;
mod merge;
mod reassign;

pub use create::{create_pull_request, CreatePullRequestRequest};
pub use get::get_pull_request;
pub use merge::{merge_pull_request, MergePullRequestRequest};
pub use reassign::{reassign_reviewer, ReassignRequest, ReassignResponse};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none", default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestResponse {
    fn from(pull_request: PullRequest) -> Self {
        Self {
            pull_request_id: pull_request.id.to_string(),
            pull_request_name: pull_request.name.as_ref().to_owned(),
            author_id: pull_request.author_id.to_string(),
            status: pull_request.status.as_str().to_owned(),
            assigned_reviewers: pull_request
                .assigned_reviewers
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at: pull_request.created_at,
            merged_at: pull_request.status.merged_at(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PullRequestShortResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl From<PullRequestShort> for PullRequestShortResponse {
    fn from(pull_request: PullRequestShort) -> Self {
        Self {
            pull_request_id: pull_request.id.to_string(),
            pull_request_name: pull_request.name.as_ref().to_owned(),
            author_id: pull_request.author_id.to_string(),
            status: pull_request.status.as_str().to_owned(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}
