use serde::{Deserialize, Serialize};

use super::{validation::parse_text, ValidationError};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Username(String);

impl Username {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        parse_text(name, "Username").map(Self)
    }
}

impl AsRef<String> for Username {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
