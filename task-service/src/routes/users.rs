//! User directory endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use hm_core::user::User;

use super::{authenticate, bad_request, user_error, MessageResponse, RouteError};
use crate::state::AppState;
use crate::users::ProfileUpdate;

#[derive(Debug, Deserialize)]
struct PasswordChange {
    old_password: String,
    new_password: String,
}

/// GET /users
async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, RouteError> {
    authenticate(&state, &headers).await?;
    Ok(Json(state.user_store().list().await))
}

/// GET /users/me
async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, RouteError> {
    authenticate(&state, &headers).await.map(Json)
}

/// PUT /users/me
async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<User>, RouteError> {
    let user = authenticate(&state, &headers).await?;
    let Json(update) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    let updated = state
        .user_store()
        .update_profile(&user.id, update)
        .await
        .map_err(user_error)?;
    info!("Profile updated for {}", updated.id);
    Ok(Json(updated))
}

/// PUT /users/me/password
async fn update_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PasswordChange>, JsonRejection>,
) -> Result<Json<MessageResponse>, RouteError> {
    let user = authenticate(&state, &headers).await?;
    let Json(change) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    state
        .user_store()
        .change_password(&user.id, &change.old_password, &change.new_password)
        .await
        .map_err(user_error)?;
    info!("Password changed for {}", user.id);
    Ok(MessageResponse::new("Password updated successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(current_user).put(update_profile))
        .route("/users/me/password", put(update_password))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::testing::{build_app, call, register};

    #[tokio::test]
    async fn user_routes_require_token() {
        let (app, _state, _temp_dir) = build_app().await;
        let (status, _) = call(&app, "GET", "/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = call(&app, "GET", "/users/me", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_users_has_no_password_hashes() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, _) = register(&app, "ann").await;
        register(&app, "bob").await;

        let (status, users) = call(&app, "GET", "/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|user| user.get("password_hash").is_none()));
    }

    #[tokio::test]
    async fn update_profile_and_password() {
        let (app, _state, _temp_dir) = build_app().await;
        let (token, user_id) = register(&app, "ann").await;

        let (status, updated) = call(
            &app,
            "PUT",
            "/users/me",
            Some(&token),
            Some(json!({ "id": user_id, "name": "Annie", "last_name": "Lee" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Annie");
        assert_eq!(updated["username"], "ann");

        let (status, _) = call(
            &app,
            "PUT",
            "/users/me/password",
            Some(&token),
            Some(json!({ "old_password": "wrong", "new_password": "next-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "PUT",
            "/users/me/password",
            Some(&token),
            Some(json!({ "old_password": "secret-pw", "new_password": "next-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "ann", "password": "next-pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
