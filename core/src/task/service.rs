//! Task service trait
//!
//! The four operations a task backend offers. The HTTP client and the
//! file-backed store both implement it; the cache is written against it.

use async_trait::async_trait;

use super::model::{Task, TaskDraft};
use super::query::TaskQuery;
use crate::Result;

#[async_trait]
pub trait TaskService: Send + Sync {
    /// List tasks matching the query
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Create a task, returning the assigned id when the backend reports it
    async fn create(&self, draft: &TaskDraft) -> Result<Option<String>>;

    /// Replace every field of an existing task
    async fn update(&self, id: &str, draft: &TaskDraft) -> Result<()>;

    /// Delete a task by id
    async fn delete(&self, id: &str) -> Result<()>;
}
