use color_eyre::eyre::eyre;
use sqlx::PgPool;

use crate::domain::{
    Team, TeamMember, TeamName, TeamStore, TeamStoreError, User, UserId,
    Username,
};

pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    username: String,
    team_name: String,
    is_active: bool,
}

impl TryFrom<UserRow> for User {
    type Error = TeamStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::parse(&row.user_id)
                .map_err(|e| TeamStoreError::UnexpectedError(eyre!(e)))?,
            Username::parse(&row.username)
                .map_err(|e| TeamStoreError::UnexpectedError(eyre!(e)))?,
            TeamName::parse(&row.team_name)
                .map_err(|e| TeamStoreError::UnexpectedError(eyre!(e)))?,
            row.is_active,
        ))
    }
}

fn unexpected(e: sqlx::Error) -> TeamStoreError {
    TeamStoreError::UnexpectedError(eyre!(e))
}

#[async_trait::async_trait]
impl TeamStore for PostgresTeamStore {
    #[tracing::instrument(name = "Adding team to PostgreSQL", skip_all)]
    async fn add_team(&self, team: &Team) -> Result<(), TeamStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO teams (team_name) VALUES ($1)
            "#,
        )
        .bind(team.team_name.as_ref())
        .execute(&mut *transaction)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                TeamStoreError::TeamExists
            }
            err => TeamStoreError::UnexpectedError(eyre!(err)),
        })?;

        for user in team.users() {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, username, team_name, is_active)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id) DO UPDATE
                SET username = EXCLUDED.username,
                    team_name = EXCLUDED.team_name,
                    is_active = EXCLUDED.is_active
                "#,
            )
            .bind(user.user_id.as_ref())
            .bind(user.username.as_ref())
            .bind(user.team_name.as_ref())
            .bind(user.is_active)
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;
        }

        transaction.commit().await.map_err(unexpected)
    }

    #[tracing::instrument(name = "Getting team from PostgreSQL", skip_all)]
    async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, TeamStoreError> {
        // Both reads share one transaction so the member list matches the
        // existence check.
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            SELECT team_name FROM teams WHERE team_name = $1
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(unexpected)?
        .ok_or(TeamStoreError::TeamNotFound)?;

        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, username, team_name, is_active
            FROM users
            WHERE team_name = $1
            ORDER BY username ASC, user_id ASC
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_all(&mut *transaction)
        .await
        .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;

        let members = rows
            .into_iter()
            .map(|row| User::try_from(row).map(TeamMember::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Team::new(team_name.clone(), members))
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, user_id: &UserId) -> Result<User, TeamStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, team_name, is_active
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => TeamStoreError::UserNotFound,
            err => TeamStoreError::UnexpectedError(eyre!(err)),
        })?
        .try_into()
    }

    #[tracing::instrument(name = "Listing users from PostgreSQL", skip_all)]
    async fn get_users(&self) -> Result<Vec<User>, TeamStoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, username, team_name, is_active
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(User::try_from).collect()
    }

    #[tracing::instrument(name = "Updating user activity in PostgreSQL", skip_all)]
    async fn set_user_activity(
        &self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<User, TeamStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET is_active = $2
            WHERE user_id = $1
            RETURNING user_id, username, team_name, is_active
            "#,
        )
        .bind(user_id.as_ref())
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(TeamStoreError::UserNotFound)?
        .try_into()
    }
}
