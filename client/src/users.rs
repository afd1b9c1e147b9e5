//! HTTP user service client

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::info;

use crate::config::ClientConfig;
use crate::http::{decode, ApiClient};
use crate::session::Session;
use hm_core::user::{User, UserDirectory};
use hm_core::Result;

#[derive(Serialize)]
struct PasswordChange<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// [`UserDirectory`] backed by the remote user service
#[derive(Clone)]
pub struct HttpUserDirectory {
    api: ApiClient,
}

impl HttpUserDirectory {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            api: ApiClient::new(&config.user_service_url, session),
        }
    }

    /// Replace the current user's profile, returning what the service stored
    pub async fn update_profile(&self, user: &User) -> Result<User> {
        let request = self.api.request(Method::PUT, "/users/me").json(user);
        let response = self.api.send(request, "update profile").await?;
        let updated: User = decode(response).await?;
        info!("Profile updated for {}", updated.id);
        Ok(updated)
    }

    pub async fn update_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let request = self
            .api
            .request(Method::PUT, "/users/me/password")
            .json(&PasswordChange {
                old_password,
                new_password,
            });
        self.api.send(request, "update password").await?;
        info!("Password updated");
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn list_users(&self) -> Result<Vec<User>> {
        let request = self.api.request(Method::GET, "/users");
        let response = self.api.send(request, "list users").await?;
        decode(response).await
    }

    async fn current_user(&self) -> Result<User> {
        let request = self.api.request(Method::GET, "/users/me");
        let response = self.api.send(request, "fetch current user").await?;
        decode(response).await
    }
}
