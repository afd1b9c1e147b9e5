//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;

use hm_core::notification::EmailNotification;
use hm_core::task::FileTaskStore;

use crate::auth::TokenKeys;
use crate::config::ServiceConfig;
use crate::users::UserStore;

/// Most recent emails kept in the outbox; older ones are dropped
pub const OUTBOX_CAPACITY: usize = 100;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    data_dir: PathBuf,
    task_store: FileTaskStore,
    user_store: UserStore,
    token_keys: TokenKeys,
    /// Emails accepted by `/send-email`; nothing is delivered
    outbox: RwLock<Vec<EmailNotification>>,
}

impl AppState {
    pub async fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let task_store = FileTaskStore::new(config.data_dir.join("tasks.json"))
            .await
            .context("Failed to load task store")?;
        let user_store = UserStore::new(config.data_dir.join("users.json"))
            .await
            .context("Failed to load user store")?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                data_dir: config.data_dir.clone(),
                task_store,
                user_store,
                token_keys: TokenKeys::new(&config.jwt_secret, config.token_ttl_minutes),
                outbox: RwLock::new(Vec::new()),
            }),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    pub fn task_store(&self) -> &FileTaskStore {
        &self.inner.task_store
    }

    pub fn user_store(&self) -> &UserStore {
        &self.inner.user_store
    }

    pub fn token_keys(&self) -> &TokenKeys {
        &self.inner.token_keys
    }

    pub async fn push_outbox(&self, notification: EmailNotification) {
        let mut outbox = self.inner.outbox.write().await;
        outbox.push(notification);
        if outbox.len() > OUTBOX_CAPACITY {
            let overflow = outbox.len() - OUTBOX_CAPACITY;
            outbox.drain(..overflow);
        }
    }

    pub async fn outbox(&self) -> Vec<EmailNotification> {
        self.inner.outbox.read().await.clone()
    }
}
