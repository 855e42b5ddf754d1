use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};
use color_eyre::eyre::Result;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::Level;

use domain::{AuthAPIError, ReviewAPIError};
pub mod routes;
use crate::utils::{
    auth::{require_admin, require_user},
    tracing::*,
};
use routes::{
    add_team, create_pull_request, get_pull_request, get_review, get_team,
    health, merge_pull_request, pull_request_stats, reassign_reviewer,
    reviewer_stats, set_is_active,
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = Json(ErrorResponse {
        error: ErrorBody {
            code: code.to_owned(),
            message,
        },
    });
    (status, body).into_response()
}

impl IntoResponse for AuthAPIError {
    fn into_response(self) -> Response {
        log_error_chain(&self, Level::DEBUG);
        error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
    }
}

impl IntoResponse for ReviewAPIError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ReviewAPIError::TeamExists(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ReviewAPIError::TeamNotFound(_)
            | ReviewAPIError::UserNotFound(_)
            | ReviewAPIError::PullRequestNotFound(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ReviewAPIError::PullRequestExists(_)
            | ReviewAPIError::PullRequestMerged(_)
            | ReviewAPIError::NotAssigned { .. }
            | ReviewAPIError::NoCandidate(_) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, self.to_string())
            }
            ReviewAPIError::ValidationError(e) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, e.as_ref().to_owned())
            }
            ReviewAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        error_response(status, self.code(), message)
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(app_state: AppState, address: &str) -> Result<Self> {
        let admin_routes = Router::new()
            .route("/team/add", post(add_team))
            .route("/users/setIsActive", post(set_is_active))
            .route("/pullRequest/create", post(create_pull_request))
            .route("/pullRequest/merge", post(merge_pull_request))
            .route("/pullRequest/reassign", post(reassign_reviewer))
            .route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                require_admin,
            ));

        let read_routes = Router::new()
            .route("/team/get", get(get_team))
            .route("/users/getReview", get(get_review))
            .route("/pullRequest/get", get(get_pull_request))
            .route("/stats/reviewers", get(reviewer_stats))
            .route("/stats/pullRequests", get(pull_request_stats))
            .route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                require_user,
            ));

        let router = Router::new()
            .route("/health", get(health))
            .merge(admin_routes)
            .merge(read_routes)
            .with_state(app_state)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}
