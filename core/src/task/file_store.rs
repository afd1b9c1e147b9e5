//! File-based task storage implementation
//!
//! Stores tasks as JSON in a file on disk. This is the backing store of the
//! reference task service.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{dedup_ids, Task, TaskDraft};
use super::query::TaskQuery;
use super::service::TaskService;
use crate::{Error, Result};

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the file, in creation order
    tasks: RwLock<Vec<Task>>,
}

impl FileTaskStore {
    /// Create a new FileTaskStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            tasks: RwLock::new(tasks),
        })
    }

    /// Persist the tasks to disk
    async fn persist(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string_pretty(tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Get a task by ID
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| t.id == id).cloned()
    }

    /// Insert a draft and return the stored task
    ///
    /// Every write goes to disk first; memory only changes once the file is written.
    pub async fn insert(&self, mut draft: TaskDraft) -> Result<Task> {
        draft.participants = dedup_ids(draft.participants);
        let task = Task::from_draft(Uuid::new_v4().simple().to_string(), draft);

        let mut tasks = self.tasks.write().await;
        let mut next = tasks.clone();
        next.push(task.clone());
        self.persist(&next).await?;
        *tasks = next;
        Ok(task)
    }

    /// Replace a task's fields and return the stored task
    pub async fn replace(&self, id: &str, mut draft: TaskDraft) -> Result<Task> {
        draft.participants = dedup_ids(draft.participants);

        let mut tasks = self.tasks.write().await;
        let mut next = tasks.clone();
        let slot = next
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        *slot = Task::from_draft(id, draft);
        let updated = slot.clone();
        self.persist(&next).await?;
        *tasks = next;
        Ok(updated)
    }

    /// Remove a task, returning whether it existed
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        let next: Vec<Task> = tasks.iter().filter(|t| t.id != id).cloned().collect();
        if next.len() == tasks.len() {
            return Ok(false);
        }
        self.persist(&next).await?;
        *tasks = next;
        Ok(true)
    }
}

#[async_trait]
impl TaskService for FileTaskStore {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| query.matches(t)).cloned().collect())
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Option<String>> {
        let task = self.insert(draft.clone()).await?;
        Ok(Some(task.id))
    }

    async fn update(&self, id: &str, draft: &TaskDraft) -> Result<()> {
        self.replace(id, draft.clone()).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.remove(id).await? {
            Ok(())
        } else {
            Err(Error::TaskNotFound(id.to_string()))
        }
    }
}
