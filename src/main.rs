use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use review_assigner::{
    app_state::AppState,
    get_postgres_pool,
    services::data_stores::{PostgresPullRequestStore, PostgresTeamStore},
    utils::{
        auth::ApiTokens,
        constants::{ADMIN_TOKEN, APP_ADDRESS, DATABASE_URL, USER_TOKEN},
        tracing::init_tracing,
    },
    Application,
};
use sqlx::PgPool;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let pg_pool = configure_postgresql().await?;

    let team_store = Arc::new(PostgresTeamStore::new(pg_pool.clone()));
    let pull_request_store = Arc::new(PostgresPullRequestStore::new(pg_pool));
    let api_tokens = ApiTokens::new(ADMIN_TOKEN.clone(), USER_TOKEN.clone());

    let app_state = AppState::new(team_store, pull_request_store, api_tokens);

    let app = Application::build(app_state, &APP_ADDRESS)
        .await
        .wrap_err("Failed to build app")?;

    app.run().await.wrap_err("Failed to run app")?;
    Ok(())
}

async fn configure_postgresql() -> Result<PgPool> {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .wrap_err("Failed to run migrations")?;

    Ok(pg_pool)
}
