use serde::{Deserialize, Serialize};

use super::{TeamName, UserId, Username};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: Username,
    pub team_name: TeamName,
    pub is_active: bool,
}

impl User {
    pub fn new(
        user_id: UserId,
        username: Username,
        team_name: TeamName,
        is_active: bool,
    ) -> Self {
        Self {
            user_id,
            username,
            team_name,
            is_active,
        }
    }
}
