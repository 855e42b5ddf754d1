use serde::{Deserialize, Serialize};

use super::{validation::parse_text, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestName(String);

impl PullRequestName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        parse_text(name, "Pull request name").map(Self)
    }
}

impl AsRef<String> for PullRequestName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

#[test]
fn test_pull_request_names() {
    assert!(PullRequestName::parse("Add search").is_ok());
    assert_eq!(
        PullRequestName::parse("").unwrap_err().as_ref(),
        "Pull request name cannot be empty"
    );
}
