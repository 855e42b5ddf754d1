use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::{
    Team, TeamMember, TeamName, TeamStore, TeamStoreError, User, UserId,
};

#[derive(Default)]
struct Directory {
    teams: HashSet<TeamName>,
    users: HashMap<UserId, User>,
}

/// In-memory directory. Each operation runs under a single lock, which
/// gives it the same all-or-nothing behaviour as a transaction.
#[derive(Default)]
pub struct HashmapTeamStore {
    directory: RwLock<Directory>,
}

impl Directory {
    fn team(&self, team_name: &TeamName) -> Result<Team, TeamStoreError> {
        if !self.teams.contains(team_name) {
            return Err(TeamStoreError::TeamNotFound);
        }

        let members = self
            .users
            .values()
            .filter(|user| &user.team_name == team_name)
            .cloned()
            .map(TeamMember::from)
            .collect();

        Ok(Team::new(team_name.clone(), members))
    }
}

#[async_trait::async_trait]
impl TeamStore for HashmapTeamStore {
    async fn add_team(&self, team: &Team) -> Result<(), TeamStoreError> {
        let mut directory = self.directory.write().await;

        if !directory.teams.insert(team.team_name.clone()) {
            return Err(TeamStoreError::TeamExists);
        }

        for user in team.users() {
            directory.users.insert(user.user_id.clone(), user);
        }
        Ok(())
    }

    async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, TeamStoreError> {
        self.directory.read().await.team(team_name)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, TeamStoreError> {
        match self.directory.read().await.users.get(user_id) {
            Some(user) => Ok(user.clone()),
            None => Err(TeamStoreError::UserNotFound),
        }
    }

    async fn get_users(&self) -> Result<Vec<User>, TeamStoreError> {
        let mut users: Vec<User> =
            self.directory.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn set_user_activity(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<User, TeamStoreError> {
        let mut directory = self.directory.write().await;
        let user = directory
            .users
            .get_mut(user_id)
            .ok_or(TeamStoreError::UserNotFound)?;

        user.is_active = is_active;
        Ok(user.clone())
    }
}
