//! HTTP routes

pub mod auth;
pub mod health;
pub mod notify;
pub mod tasks;
pub mod users;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use hm_core::user::User;

use crate::state::AppState;
use crate::users::UserError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

pub fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

pub fn conflict(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::CONFLICT, error)
}

pub fn internal_error(error: impl std::fmt::Display) -> RouteError {
    route_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

pub fn user_error(error: UserError) -> RouteError {
    match error {
        UserError::InvalidInput(message) => bad_request(message),
        UserError::Unauthorized(message) => unauthorized(message),
        UserError::NotFound(message) => not_found(message),
        UserError::Conflict(message) => conflict(message),
        UserError::Storage(message) => internal_error(message),
    }
}

/// Resolve the bearer token to a known user
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, RouteError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    let claims = state.token_keys().verify(token).map_err(|err| {
        tracing::debug!("Rejected bearer token: {}", err);
        unauthorized("Token is invalid or expired")
    })?;
    state
        .user_store()
        .get(&claims.sub)
        .await
        .ok_or_else(|| unauthorized("Token is invalid or expired"))
}
