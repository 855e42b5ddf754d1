use axum::{extract::rejection::JsonRejection, Json};

use crate::domain::{ReviewAPIError, ValidationError};

mod health;
mod pull_requests;
mod stats;
mod teams;
mod users;

pub use health::*;
pub use pull_requests::*;
pub use stats::*;
pub use teams::*;
pub use users::*;

// Malformed bodies are reported as INVALID_REQUEST like any other
// validation failure.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ReviewAPIError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ValidationError::new(rejection.body_text()).into())
}
