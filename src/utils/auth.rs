use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, Secret};

use crate::{domain::AuthAPIError, AppState};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

/// The two static API tokens. Admin tokens may call every route, user
/// tokens only the read routes.
#[derive(Debug, Clone)]
pub struct ApiTokens {
    admin: Secret<String>,
    user: Secret<String>,
}

impl ApiTokens {
    pub fn new(admin: Secret<String>, user: Secret<String>) -> Self {
        Self { admin, user }
    }

    pub fn role(&self, token: &str) -> Option<Role> {
        if token == self.admin.expose_secret() {
            Some(Role::Admin)
        } else if token == self.user.expose_secret() {
            Some(Role::User)
        } else {
            None
        }
    }
}

// Accepts both `Bearer <token>` and a bare token.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthAPIError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthAPIError::MissingToken)?
        .to_str()
        .map_err(|_| AuthAPIError::InvalidToken)?
        .trim();

    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            token.trim()
        }
        _ if value.eq_ignore_ascii_case(BEARER_SCHEME) => "",
        _ => value,
    };
    if token.is_empty() {
        return Err(AuthAPIError::MissingToken);
    }
    Ok(token)
}

fn authorize(
    tokens: &ApiTokens,
    headers: &HeaderMap,
    allowed: &[Role],
) -> Result<Role, AuthAPIError> {
    let token = extract_token(headers)?;
    match tokens.role(token) {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(AuthAPIError::InvalidToken),
    }
}

#[tracing::instrument(name = "Checking admin token", skip_all)]
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthAPIError> {
    authorize(&state.api_tokens, request.headers(), &[Role::Admin])?;
    Ok(next.run(request).await)
}

#[tracing::instrument(name = "Checking user token", skip_all)]
pub async fn require_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthAPIError> {
    let role = authorize(
        &state.api_tokens,
        request.headers(),
        &[Role::Admin, Role::User],
    )?;
    tracing::debug!("authorized as {role:?}");
    Ok(next.run(request).await)
}
