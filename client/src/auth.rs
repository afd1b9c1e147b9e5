//! Login and registration against the auth service

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ClientConfig;
use crate::http::{decode, ApiClient};
use crate::session::Session;
use hm_core::user::User;
use hm_core::Result;

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Fields of a new account
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Obtains bearer tokens and stores them in the shared [`Session`]
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            api: ApiClient::new(&config.auth_service_url, session),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let request = self
            .api
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest { username, password });
        let response = self.api.send(request, "log in").await?;
        let auth: AuthResponse = decode(response).await?;
        self.api.session().set_token(auth.access_token.clone());
        info!("Logged in as {}", username);
        Ok(auth)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let request = self
            .api
            .request(Method::POST, "/auth/register")
            .json(registration);
        let response = self.api.send(request, "register").await?;
        let auth: AuthResponse = decode(response).await?;
        self.api.session().set_token(auth.access_token.clone());
        info!("Registered {}", registration.username);
        Ok(auth)
    }

    /// Forget the token. Callers also clear their task cache.
    pub fn logout(&self) {
        self.api.session().clear();
        info!("Logged out");
    }
}
