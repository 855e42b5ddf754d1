use std::fmt;

use serde::{Deserialize, Serialize};

use super::{validation::parse_text, ValidationError};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PullRequestId(String);

impl PullRequestId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        parse_text(id, "Pull request ID").map(Self)
    }
}

impl AsRef<String> for PullRequestId {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[test]
fn test_valid_ids() {
    let parsed = PullRequestId::parse("pr-1001").expect("pr-1001");
    assert_eq!(parsed.to_string(), "pr-1001");
}

#[test]
fn test_invalid_ids() {
    let error = PullRequestId::parse(" ").expect_err("blank ID");
    assert_eq!(error.as_ref(), "Pull request ID cannot be empty");
}
