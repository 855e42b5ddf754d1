//! Store tests against a real PostgreSQL server. Each test runs in a fresh
//! database created from `DATABASE_URL`; run with `cargo test -- --ignored`.

use std::str::FromStr;

use chrono::{SubsecRound, Utc};
use review_assigner::{
    domain::{
        PullRequest, PullRequestId, PullRequestName, PullRequestStore,
        PullRequestStoreError, Team, TeamMember, TeamName, TeamStore,
        TeamStoreError, UserId, Username,
    },
    services::data_stores::{PostgresPullRequestStore, PostgresTeamStore},
    utils::constants::DATABASE_URL,
};
use secrecy::ExposeSecret;
use sqlx::{
    postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
    Connection, Executor,
};
use test_context::{test_context, AsyncTestContext};
use uuid::Uuid;

pub struct PostgresStores {
    db_name: String,
    teams: PostgresTeamStore,
    pull_requests: PostgresPullRequestStore,
}

impl AsyncTestContext for PostgresStores {
    async fn setup() -> PostgresStores {
        let db_name = Uuid::new_v4().to_string();
        let options = connect_options();

        let mut connection = PgConnection::connect_with(&options)
            .await
            .expect("Failed to connect to Postgres");
        connection
            .execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create database.");

        let pool = PgPoolOptions::new()
            .connect_with(options.database(&db_name))
            .await
            .expect("Failed to create Postgres connection pool.");

        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("Failed to migrate the database");

        PostgresStores {
            db_name,
            teams: PostgresTeamStore::new(pool.clone()),
            pull_requests: PostgresPullRequestStore::new(pool),
        }
    }

    async fn teardown(self) {
        let PostgresStores {
            db_name,
            teams,
            pull_requests,
        } = self;
        drop(teams);
        drop(pull_requests);

        let mut connection = PgConnection::connect_with(&connect_options())
            .await
            .expect("Failed to connect to Postgres");

        // Kill any active connections to the database
        connection
            .execute(
                format!(
                    r#"
                    SELECT pg_terminate_backend(pg_stat_activity.pid)
                    FROM pg_stat_activity
                    WHERE pg_stat_activity.datname = '{}'
                      AND pid <> pg_backend_pid();
                    "#,
                    db_name
                )
                .as_str(),
            )
            .await
            .expect("Failed to drop the database.");

        connection
            .execute(format!(r#"DROP DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to drop the database.");
    }
}

fn connect_options() -> PgConnectOptions {
    PgConnectOptions::from_str(DATABASE_URL.expose_secret())
        .expect("Failed to parse PostgreSQL connection string")
}

fn user(id: &str) -> UserId {
    UserId::parse(id).unwrap()
}

fn backend() -> Team {
    Team::new(
        TeamName::parse("backend").unwrap(),
        [("alice", "Alice"), ("bob", "Bob"), ("charlie", "Charlie")]
            .iter()
            .map(|(id, name)| {
                TeamMember::new(user(id), Username::parse(name).unwrap(), true)
            })
            .collect(),
    )
}

fn pull_request(id: &str, reviewers: &[&str]) -> PullRequest {
    PullRequest::open(
        PullRequestId::parse(id).unwrap(),
        PullRequestName::parse("Add search").unwrap(),
        user("alice"),
        reviewers.iter().map(|id| user(id)).collect(),
        Utc::now().trunc_subsecs(6),
    )
    .unwrap()
}

#[test_context(PostgresStores)]
#[tokio::test]
#[ignore]
async fn team_store_round_trip(stores: &mut PostgresStores) {
    let team = backend();
    stores.teams.add_team(&team).await.unwrap();

    assert_eq!(stores.teams.get_team(&team.team_name).await, Ok(team.clone()));
    assert_eq!(
        stores.teams.add_team(&team).await,
        Err(TeamStoreError::TeamExists)
    );

    let updated = stores
        .teams
        .set_user_activity(&user("bob"), false)
        .await
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(
        stores.teams.set_user_activity(&user("nobody"), true).await,
        Err(TeamStoreError::UserNotFound)
    );
}

#[test_context(PostgresStores)]
#[tokio::test]
#[ignore]
async fn pull_request_store_round_trip(stores: &mut PostgresStores) {
    stores.teams.add_team(&backend()).await.unwrap();

    let pr = pull_request("pr-1", &["bob", "charlie"]);
    stores.pull_requests.add_pull_request(&pr).await.unwrap();
    assert_eq!(
        stores.pull_requests.add_pull_request(&pr).await,
        Err(PullRequestStoreError::PullRequestExists)
    );
    assert_eq!(stores.pull_requests.get_pull_request(&pr.id).await, Ok(pr.clone()));

    let merged_at = Utc::now().trunc_subsecs(6);
    let (merged, applied) = stores
        .pull_requests
        .merge_pull_request(&pr.id, merged_at)
        .await
        .unwrap();
    let (again, reapplied) = stores
        .pull_requests
        .merge_pull_request(&pr.id, Utc::now().trunc_subsecs(6))
        .await
        .unwrap();
    assert_eq!(merged.status.merged_at(), Some(merged_at));
    assert_eq!(merged, again);
    assert!(applied);
    assert!(!reapplied);

    let stats = stores.pull_requests.get_pull_request_stats().await.unwrap();
    assert_eq!(stats.total_prs, 1);
    assert_eq!(stats.merged_prs, 1);
}

#[test_context(PostgresStores)]
#[tokio::test]
#[ignore]
async fn replace_reviewer_checks_state(stores: &mut PostgresStores) {
    let mut team = backend();
    team.members.push(TeamMember::new(
        user("dave"),
        Username::parse("Dave").unwrap(),
        true,
    ));
    team.members.push(TeamMember::new(
        user("erin"),
        Username::parse("Erin").unwrap(),
        false,
    ));
    stores.teams.add_team(&team).await.unwrap();
    stores
        .teams
        .add_team(&Team::new(
            TeamName::parse("frontend").unwrap(),
            vec![TeamMember::new(
                user("grace"),
                Username::parse("Grace").unwrap(),
                true,
            )],
        ))
        .await
        .unwrap();

    let pr = pull_request("pr-1", &["bob", "charlie"]);
    stores.pull_requests.add_pull_request(&pr).await.unwrap();

    let updated = stores
        .pull_requests
        .replace_reviewer(&pr.id, &user("bob"), &user("dave"))
        .await
        .unwrap();
    assert_eq!(updated.assigned_reviewers, [user("charlie"), user("dave")]);

    assert_eq!(
        stores
            .pull_requests
            .replace_reviewer(&pr.id, &user("bob"), &user("dave"))
            .await,
        Err(PullRequestStoreError::ReviewerNotAssigned)
    );
    assert_eq!(
        stores
            .pull_requests
            .replace_reviewer(&pr.id, &user("dave"), &user("charlie"))
            .await,
        Err(PullRequestStoreError::ReviewerAlreadyAssigned)
    );

    for candidate in ["erin", "grace", "nobody"] {
        assert_eq!(
            stores
                .pull_requests
                .replace_reviewer(&pr.id, &user("dave"), &user(candidate))
                .await,
            Err(PullRequestStoreError::ReviewerUnavailable),
            "{candidate} must not replace dave"
        );
    }
    stores
        .teams
        .set_user_activity(&user("bob"), false)
        .await
        .unwrap();
    assert_eq!(
        stores
            .pull_requests
            .replace_reviewer(&pr.id, &user("dave"), &user("bob"))
            .await,
        Err(PullRequestStoreError::ReviewerUnavailable)
    );

    let stats: Vec<(String, u64)> = stores
        .pull_requests
        .get_reviewer_stats()
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.user_id.to_string(), s.total_assignments))
        .collect();
    assert_eq!(
        stats,
        [
            ("charlie".to_owned(), 1),
            ("dave".to_owned(), 1),
            ("alice".to_owned(), 0),
            ("bob".to_owned(), 0),
            ("erin".to_owned(), 0),
            ("grace".to_owned(), 0),
        ]
    );

    let reviewing = stores
        .pull_requests
        .get_reviewer_pull_requests(&user("dave"))
        .await
        .unwrap();
    assert_eq!(reviewing.len(), 1);
    assert_eq!(reviewing[0].id, pr.id);

    stores
        .pull_requests
        .merge_pull_request(&pr.id, Utc::now().trunc_subsecs(6))
        .await
        .unwrap();
    assert_eq!(
        stores
            .pull_requests
            .replace_reviewer(&pr.id, &user("dave"), &user("alice"))
            .await,
        Err(PullRequestStoreError::PullRequestMerged)
    );
    assert_eq!(
        stores
            .pull_requests
            .get_pull_request(&pr.id)
            .await
            .unwrap()
            .assigned_reviewers,
        [user("charlie"), user("dave")]
    );
}
