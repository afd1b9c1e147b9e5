//! Registration and login

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use hm_core::user::User;

use super::{bad_request, internal_error, user_error, RouteError};
use crate::state::AppState;
use crate::users::NewUser;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(alias = "email")]
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    access_token: String,
    token_type: &'static str,
    user: User,
}

fn auth_response(state: &AppState, user: User) -> Result<Json<AuthResponse>, RouteError> {
    let access_token = state.token_keys().issue(&user.id).map_err(internal_error)?;
    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), RouteError> {
    let Json(new_user) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let user = state
        .user_store()
        .register(new_user)
        .await
        .map_err(user_error)?;
    info!("Registered user {} ({})", user.username, user.id);
    Ok((StatusCode::CREATED, auth_response(&state, user)?))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, RouteError> {
    let Json(request) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let user = state
        .user_store()
        .authenticate(&request.username, &request.password)
        .await
        .map_err(user_error)?;
    info!("User {} logged in", user.username);
    auth_response(&state, user)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
