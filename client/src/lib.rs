//! Client side of the household manager
//!
//! HTTP clients for the task, user, auth and notification services, and the
//! [`TaskStore`] cache that views read from.

mod auth;
mod config;
mod http;
mod notify;
mod session;
mod store;
mod tasks;
mod users;

pub use auth::{AuthClient, AuthResponse, Registration};
pub use config::ClientConfig;
pub use notify::NotificationClient;
pub use session::Session;
pub use store::{TaskSnapshot, TaskStore};
pub use tasks::HttpTaskService;
pub use users::HttpUserDirectory;

pub use hm_core::{Error, Result};
