use std::fmt;

use serde::{Deserialize, Serialize};

use super::{validation::parse_text, ValidationError};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TeamName(String);

impl TeamName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        parse_text(name, "Team name").map(Self)
    }
}

impl AsRef<String> for TeamName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[test]
fn test_valid_team_names() {
    let valid_names = ["a".to_string(), "backend".to_string(), "a".repeat(255)];
    for valid_name in valid_names.iter() {
        let parsed =
            TeamName::parse(valid_name).expect("Failed to parse valid team name");

        assert_eq!(parsed.as_ref(), valid_name);
    }
}

#[test]
fn test_empty_team_names() {
    for empty_name in ["", "   "] {
        let result = TeamName::parse(empty_name);
        assert_eq!(
            result.unwrap_err().as_ref(),
            "Team name cannot be empty"
        );
    }
}

#[test]
fn test_long_team_names() {
    let long_name = "a".repeat(256);
    let result = TeamName::parse(&long_name);
    assert_eq!(
        result.unwrap_err().as_ref(),
        "Max team name length is 255 characters"
    );
}
