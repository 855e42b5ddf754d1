use serde::{Deserialize, Serialize};

use super::{TeamName, User, UserId, Username};

/// A team together with its members, ordered by username ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: TeamName,
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn new(team_name: TeamName, mut members: Vec<TeamMember>) -> Self {
        members.sort_by(|a, b| {
            a.username
                .cmp(&b.username)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Self {
            team_name,
            members,
        }
    }

    pub fn active_members(&self) -> impl Iterator<Item = &TeamMember> {
        self.members.iter().filter(|member| member.is_active)
    }

    /// The members as directory users owned by this team.
    pub fn users(&self) -> impl Iterator<Item = User> + '_ {
        self.members.iter().map(|member| {
            User::new(
                member.user_id.clone(),
                member.username.clone(),
                self.team_name.clone(),
                member.is_active,
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: Username,
    pub is_active: bool,
}

impl TeamMember {
    pub fn new(user_id: UserId, username: Username, is_active: bool) -> Self {
        Self {
            user_id,
            username,
            is_active,
        }
    }
}

impl From<User> for TeamMember {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}
