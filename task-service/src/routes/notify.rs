//! Email notification endpoint
//!
//! Accepted emails are logged and kept in the in-memory outbox.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use tracing::info;

use hm_core::notification::EmailNotification;

use super::{authenticate, bad_request, MessageResponse, RouteError};
use crate::state::AppState;

/// POST /send-email
async fn send_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<EmailNotification>, JsonRejection>,
) -> Result<Json<MessageResponse>, RouteError> {
    let user = authenticate(&state, &headers).await?;
    let Json(notification) = body.map_err(|rejection| bad_request(rejection.body_text()))?;
    notification
        .validate()
        .map_err(|err| bad_request(err.to_string()))?;

    for recipient in &notification.recipients {
        info!(
            "Queued email '{}' to {} (from {})",
            notification.subject, recipient, user.username
        );
    }
    state.push_outbox(notification).await;
    Ok(MessageResponse::new("Email sent successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/send-email", post(send_email))
}
