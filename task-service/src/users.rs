//! File-backed user accounts

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use hm_core::user::User;

use crate::auth::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    id: String,
    username: String,
    name: String,
    last_name: String,
    email: String,
    password_hash: String,
}

impl StoredUser {
    fn public(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Fields a user may change on their own profile; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct UserStore {
    path: PathBuf,
    users: RwLock<Vec<StoredUser>>,
}

impl UserStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, UserError> {
        let path = path.into();
        let users = load_users(&path).await?;
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub async fn register(&self, new_user: NewUser) -> Result<User, UserError> {
        let username = required("Username", &new_user.username)?;
        let name = required("Name", &new_user.name)?;
        let last_name = required("Last name", &new_user.last_name)?;
        let email = normalize_email(&new_user.email)?;
        if new_user.password.is_empty() {
            return Err(UserError::InvalidInput("Password cannot be empty".to_string()));
        }

        let mut users = self.users.write().await;
        ensure_available(&users, None, &username, &email)?;

        let stored = StoredUser {
            id: Uuid::new_v4().simple().to_string(),
            username,
            name,
            last_name,
            email,
            password_hash: hash_password(&new_user.password),
        };
        let user = stored.public();
        users.push(stored);
        persist_users(&self.path, &users).await?;
        Ok(user)
    }

    /// Check credentials; `login` may be the username or the email
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<User, UserError> {
        let login = login.trim();
        let users = self.users.read().await;
        users
            .iter()
            .find(|user| user.username == login || user.email.eq_ignore_ascii_case(login))
            .filter(|user| verify_password(&user.password_hash, password))
            .map(StoredUser::public)
            .ok_or_else(|| UserError::Unauthorized("Invalid credentials".to_string()))
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.iter().map(StoredUser::public).collect()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .map(StoredUser::public)
    }

    pub async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(|| UserError::NotFound(format!("User '{}'", id)))?;

        let current = &users[index];
        let username = match &update.username {
            Some(value) => required("Username", value)?,
            None => current.username.clone(),
        };
        let name = match &update.name {
            Some(value) => required("Name", value)?,
            None => current.name.clone(),
        };
        let last_name = match &update.last_name {
            Some(value) => required("Last name", value)?,
            None => current.last_name.clone(),
        };
        let email = match &update.email {
            Some(value) => normalize_email(value)?,
            None => current.email.clone(),
        };
        ensure_available(&users, Some(id), &username, &email)?;

        let user = &mut users[index];
        user.username = username;
        user.name = name;
        user.last_name = last_name;
        user.email = email;
        let updated = user.public();
        persist_users(&self.path, &users).await?;
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), UserError> {
        if new_password.is_empty() {
            return Err(UserError::InvalidInput("Password cannot be empty".to_string()));
        }

        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| UserError::NotFound(format!("User '{}'", id)))?;
        if !verify_password(&user.password_hash, old_password) {
            return Err(UserError::InvalidInput("Old password is incorrect".to_string()));
        }
        user.password_hash = hash_password(new_password);
        persist_users(&self.path, &users).await
    }
}

fn required(field: &str, value: &str) -> Result<String, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(email: &str) -> Result<String, UserError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return Err(UserError::InvalidInput("Invalid email".to_string()));
    }
    Ok(normalized)
}

fn ensure_available(
    users: &[StoredUser],
    except_id: Option<&str>,
    username: &str,
    email: &str,
) -> Result<(), UserError> {
    let others = users
        .iter()
        .filter(|user| Some(user.id.as_str()) != except_id);
    for user in others {
        if user.username == username {
            return Err(UserError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        if user.email == email {
            return Err(UserError::Conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }
    }
    Ok(())
}

async fn load_users(path: &Path) -> Result<Vec<StoredUser>, UserError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| UserError::Storage(format!("Failed to read users: {}", err)))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .map_err(|err| UserError::Storage(format!("Failed to parse users: {}", err)))
}

async fn persist_users(path: &Path, users: &[StoredUser]) -> Result<(), UserError> {
    let content = serde_json::to_string_pretty(users)
        .map_err(|err| UserError::Storage(format!("Failed to serialize users: {}", err)))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| UserError::Storage(format!("Failed to create data dir: {}", err)))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|err| UserError::Storage(format!("Failed to write users: {}", err)))
}
