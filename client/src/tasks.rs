//! HTTP task service client

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::http::{decode, decode_lenient, ApiClient};
use crate::session::Session;
use hm_core::task::{Task, TaskDraft, TaskQuery, TaskRecord, TaskService};
use hm_core::{Error, Result};

/// [`TaskService`] backed by the remote task service
#[derive(Clone)]
pub struct HttpTaskService {
    api: ApiClient,
}

impl HttpTaskService {
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            api: ApiClient::new(&config.task_service_url, session),
        }
    }

    fn task_path(id: &str) -> String {
        format!("/tasks/{}", urlencoding::encode(id))
    }
}

/// Pull the assigned id out of a create response
///
/// Depending on the service version that is `{task_id}`, the full record
/// (`_id` or `id`), or only `{message}`.
fn created_id(body: &serde_json::Value) -> Option<String> {
    ["task_id", "_id", "id"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Normalize a list body one element at a time, skipping records that do not decode
fn tasks_from_values(values: Vec<serde_json::Value>) -> Vec<Task> {
    values
        .into_iter()
        .filter_map(|value| {
            let task = serde_json::from_value::<TaskRecord>(value)
                .map_err(|e| Error::Decode(e.to_string()))
                .and_then(Task::try_from);
            match task {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!("Skipping malformed task record: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let request = self
            .api
            .request(Method::GET, "/tasks")
            .query(&query.to_query_pairs());
        let response = self.api.send(request, "list tasks").await?;
        let values: Vec<serde_json::Value> = decode(response).await?;
        Ok(tasks_from_values(values))
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Option<String>> {
        let request = self.api.request(Method::POST, "/tasks").json(draft);
        let response = self.api.send(request, "create task").await?;
        let id = created_id(&decode_lenient(response).await);
        info!("Task created: {}", id.as_deref().unwrap_or("<unreported id>"));
        Ok(id)
    }

    async fn update(&self, id: &str, draft: &TaskDraft) -> Result<()> {
        let request = self
            .api
            .request(Method::PUT, &Self::task_path(id))
            .json(draft);
        self.api.send(request, "update task").await?;
        info!("Task updated: {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let request = self.api.request(Method::DELETE, &Self::task_path(id));
        self.api.send(request, "delete task").await?;
        info!("Task deleted: {}", id);
        Ok(())
    }
}
