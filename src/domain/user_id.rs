use std::fmt;

use serde::{Deserialize, Serialize};

use super::{validation::parse_text, ValidationError};

/// Externally assigned user identifier, e.g. `"u1"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(String);

impl UserId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        parse_text(id, "User ID").map(Self)
    }
}

impl AsRef<String> for UserId {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[test]
fn test_valid_ids() {
    let valid_id = "u1";
    let parsed = UserId::parse(valid_id).expect(valid_id);
    assert_eq!(parsed.as_ref(), valid_id, "ID does not match expected value");
}

#[test]
fn test_invalid_ids() {
    let result = UserId::parse("");
    let error = result.expect_err("empty ID");
    assert_eq!(error.as_ref(), "User ID cannot be empty");
}

#[test]
fn test_ids_order_lexicographically() {
    let mut ids = ["u3", "u1", "u2"]
        .iter()
        .map(|id| UserId::parse(id).unwrap())
        .collect::<Vec<_>>();
    ids.sort();
    assert_eq!(
        ids.iter().map(|id| id.as_ref().as_str()).collect::<Vec<_>>(),
        ["u1", "u2", "u3"]
    );
}
