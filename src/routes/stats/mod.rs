mod pull_requests;
mod reviewers;

pub use pull_requests::pull_request_stats;
pub use reviewers::{reviewer_stats, ReviewerStatsResponse};
