//! Reference task service for the household manager
//!
//! Serves the task, user, auth and notification routes the client crate
//! talks to, backed by JSON files in a data directory.

pub mod auth;
pub mod config;
mod routes;
pub mod state;
pub mod users;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ServiceConfig;
pub use state::AppState;

/// Build the full router over `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::tasks::router())
        .merge(routes::notify::router())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
