use axum::Json;
use serde::{Deserialize, Serialize};

#[tracing::instrument(name = "Health route handler", skip_all)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
    })
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
