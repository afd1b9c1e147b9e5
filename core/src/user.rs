//! User records and the user directory trait
//!
//! Users are owned by the user service; this side only reads them to turn
//! participant and owner ids into names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    /// `GET /users` only sends id and names, so the rest may be empty
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    /// `"{name} {last_name}"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Read access to the user service
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every user the caller may assign to a task
    async fn list_users(&self) -> Result<Vec<User>>;

    /// The user the bearer credential belongs to
    async fn current_user(&self) -> Result<User>;
}
