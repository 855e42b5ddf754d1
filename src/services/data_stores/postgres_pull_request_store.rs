use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Report};
use sqlx::{PgConnection, PgPool};

use crate::domain::{
    PullRequest, PullRequestId, PullRequestName, PullRequestShort,
    PullRequestStats, PullRequestStatus, PullRequestStore,
    PullRequestStoreError, ReviewerStats, UserId, Username,
};

pub struct PostgresPullRequestStore {
    pool: PgPool,
}

impl PostgresPullRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PullRequestRow {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
    status: String,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct ReviewerStatsRow {
    user_id: String,
    username: String,
    total_assignments: i64,
}

#[derive(sqlx::FromRow)]
struct PullRequestStatsRow {
    total: i64,
    open: i64,
    merged: i64,
    with_reviewers: i64,
    without_reviewers: i64,
}

fn unexpected<E>(e: E) -> PullRequestStoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    PullRequestStoreError::UnexpectedError(Report::new(e))
}

impl PullRequestRow {
    fn into_summary(self) -> Result<PullRequestShort, PullRequestStoreError> {
        Ok(PullRequestShort {
            id: PullRequestId::parse(&self.pull_request_id).map_err(unexpected)?,
            name: PullRequestName::parse(&self.pull_request_name)
                .map_err(unexpected)?,
            author_id: UserId::parse(&self.author_id).map_err(unexpected)?,
            status: PullRequestStatus::from_parts(&self.status, self.merged_at)
                .map_err(unexpected)?,
        })
    }

    fn into_pull_request(
        self,
        reviewer_ids: Vec<String>,
    ) -> Result<PullRequest, PullRequestStoreError> {
        let created_at = self.created_at;
        let summary = self.into_summary()?;
        let reviewers = reviewer_ids
            .iter()
            .map(|id| UserId::parse(id))
            .collect::<Result<Vec<_>, _>>()
            .map_err(unexpected)?;

        PullRequest::restore(
            summary.id,
            summary.name,
            summary.author_id,
            summary.status,
            reviewers,
            created_at,
        )
        .map_err(unexpected)
    }
}

// With `lock` the PR row stays locked until the caller's transaction ends.
async fn load_pull_request(
    conn: &mut PgConnection,
    id: &PullRequestId,
    lock: bool,
) -> Result<PullRequest, PullRequestStoreError> {
    let query = if lock {
        r#"
        SELECT pull_request_id, pull_request_name, author_id, status, created_at, merged_at
        FROM pull_requests
        WHERE pull_request_id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT pull_request_id, pull_request_name, author_id, status, created_at, merged_at
        FROM pull_requests
        WHERE pull_request_id = $1
        "#
    };

    let row: PullRequestRow = sqlx::query_as(query)
        .bind(id.as_ref())
        .fetch_optional(&mut *conn)
        .await
        .map_err(unexpected)?
        .ok_or(PullRequestStoreError::PullRequestNotFound)?;

    let reviewer_ids: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT reviewer_id
        FROM pull_request_reviewers
        WHERE pull_request_id = $1
        ORDER BY reviewer_id
        "#,
    )
    .bind(id.as_ref())
    .fetch_all(&mut *conn)
    .await
    .map_err(unexpected)?;

    row.into_pull_request(reviewer_ids)
}

fn count(value: i64) -> Result<u64, PullRequestStoreError> {
    u64::try_from(value).map_err(unexpected)
}

#[async_trait::async_trait]
impl PullRequestStore for PostgresPullRequestStore {
    #[tracing::instrument(name = "Adding pull request to PostgreSQL", skip_all)]
    async fn add_pull_request(
        &self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests (pull_request_id, pull_request_name, author_id, status, created_at, merged_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(pull_request.id.as_ref())
        .bind(pull_request.name.as_ref())
        .bind(pull_request.author_id.as_ref())
        .bind(pull_request.status.as_str())
        .bind(pull_request.created_at)
        .bind(pull_request.status.merged_at())
        .execute(&mut *transaction)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                PullRequestStoreError::PullRequestExists
            }
            err => PullRequestStoreError::UnexpectedError(eyre!(err)),
        })?;

        for reviewer in pull_request.assigned_reviewers.iter() {
            sqlx::query(
                r#"
                INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(pull_request.id.as_ref())
            .bind(reviewer.as_ref())
            .execute(&mut *transaction)
            .await
            .map_err(unexpected)?;
        }

        transaction.commit().await.map_err(unexpected)
    }

    #[tracing::instrument(name = "Getting pull request from PostgreSQL", skip_all)]
    async fn get_pull_request(
        &self,
        id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;
        let pull_request = load_pull_request(&mut transaction, id, false).await?;
        transaction.commit().await.map_err(unexpected)?;
        Ok(pull_request)
    }

    #[tracing::instrument(name = "Merging pull request in PostgreSQL", skip_all)]
    async fn merge_pull_request(
        &self,
        id: &PullRequestId,
        merged_at: DateTime<Utc>,
    ) -> Result<(PullRequest, bool), PullRequestStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;
        let mut pull_request =
            load_pull_request(&mut transaction, id, true).await?;

        if !pull_request.merge(merged_at) {
            return Ok((pull_request, false));
        }

        sqlx::query(
            r#"
            UPDATE pull_requests
            SET status = $2, merged_at = $3
            WHERE pull_request_id = $1
            "#,
        )
        .bind(id.as_ref())
        .bind(pull_request.status.as_str())
        .bind(merged_at)
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        transaction.commit().await.map_err(unexpected)?;
        Ok((pull_request, true))
    }

    #[tracing::instrument(name = "Replacing reviewer in PostgreSQL", skip_all)]
    async fn replace_reviewer(
        &self,
        id: &PullRequestId,
        old: &UserId,
        new: &UserId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        let mut transaction = self.pool.begin().await.map_err(unexpected)?;

        // The row lock serializes concurrent reassignments of one PR.
        let pull_request = load_pull_request(&mut transaction, id, true).await?;
        if pull_request.status.is_merged() {
            return Err(PullRequestStoreError::PullRequestMerged);
        }
        if &pull_request.author_id == new {
            return Err(PullRequestStoreError::ReviewerAlreadyAssigned);
        }

        let removed = sqlx::query(
            r#"
            DELETE FROM pull_request_reviewers
            WHERE pull_request_id = $1 AND reviewer_id = $2
            "#,
        )
        .bind(id.as_ref())
        .bind(old.as_ref())
        .execute(&mut *transaction)
        .await
        .map_err(unexpected)?;

        if removed.rows_affected() == 0 {
            return Err(PullRequestStoreError::ReviewerNotAssigned);
        }

        // FOR SHARE holds off a concurrent deactivation or team move of the
        // candidate until this transaction ends.
        let available: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT candidate.is_active AND candidate.team_name = previous.team_name
            FROM users candidate
            JOIN users previous ON previous.user_id = $2
            WHERE candidate.user_id = $1
            FOR SHARE OF candidate
            "#,
        )
        .bind(new.as_ref())
        .bind(old.as_ref())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(unexpected)?;

        if !available.unwrap_or(false) {
            return Err(PullRequestStoreError::ReviewerUnavailable);
        }

        sqlx::query(
            r#"
            INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(id.as_ref())
        .bind(new.as_ref())
        .execute(&mut *transaction)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                PullRequestStoreError::ReviewerAlreadyAssigned
            }
            err => PullRequestStoreError::UnexpectedError(eyre!(err)),
        })?;

        let updated = load_pull_request(&mut transaction, id, false).await?;
        transaction.commit().await.map_err(unexpected)?;
        Ok(updated)
    }

    #[tracing::instrument(
        name = "Getting reviewer pull requests from PostgreSQL",
        skip_all
    )]
    async fn get_reviewer_pull_requests(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        let rows: Vec<PullRequestRow> = sqlx::query_as(
            r#"
            SELECT pr.pull_request_id, pr.pull_request_name, pr.author_id, pr.status,
                   pr.created_at, pr.merged_at
            FROM pull_requests pr
            JOIN pull_request_reviewers prr ON pr.pull_request_id = prr.pull_request_id
            WHERE prr.reviewer_id = $1
            ORDER BY pr.created_at DESC, pr.pull_request_id DESC
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(PullRequestRow::into_summary).collect()
    }

    #[tracing::instrument(name = "Getting reviewer stats", skip_all)]
    async fn get_reviewer_stats(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestStoreError> {
        let rows: Vec<ReviewerStatsRow> = sqlx::query_as(
            r#"
            SELECT u.user_id, u.username, COUNT(prr.reviewer_id) AS total_assignments
            FROM users u
            LEFT JOIN pull_request_reviewers prr ON prr.reviewer_id = u.user_id
            GROUP BY u.user_id, u.username
            ORDER BY total_assignments DESC, u.username COLLATE "C" ASC, u.user_id COLLATE "C" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter()
            .map(|row| {
                Ok(ReviewerStats {
                    user_id: UserId::parse(&row.user_id).map_err(unexpected)?,
                    username: Username::parse(&row.username)
                        .map_err(unexpected)?,
                    total_assignments: count(row.total_assignments)?,
                })
            })
            .collect()
    }

    #[tracing::instrument(name = "Getting pull request stats", skip_all)]
    async fn get_pull_request_stats(
        &self,
    ) -> Result<PullRequestStats, PullRequestStoreError> {
        let row: PullRequestStatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'OPEN') AS open,
                COUNT(*) FILTER (WHERE status = 'MERGED') AS merged,
                COUNT(*) FILTER (WHERE EXISTS (
                    SELECT 1 FROM pull_request_reviewers prr
                    WHERE prr.pull_request_id = pr.pull_request_id
                )) AS with_reviewers,
                COUNT(*) FILTER (WHERE NOT EXISTS (
                    SELECT 1 FROM pull_request_reviewers prr
                    WHERE prr.pull_request_id = pr.pull_request_id
                )) AS without_reviewers
            FROM pull_requests pr
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(PullRequestStats {
            total_prs: count(row.total)?,
            open_prs: count(row.open)?,
            merged_prs: count(row.merged)?,
            prs_with_reviewers: count(row.with_reviewers)?,
            prs_without_reviewers: count(row.without_reviewers)?,
        })
    }
}
