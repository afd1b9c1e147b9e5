//! Client-side task cache
//!
//! [`TaskStore`] keeps a copy of the task list consistent with a
//! [`TaskService`]: every mutation goes to the service first and the cache
//! follows, either by refetching or by a local removal for deletes. The
//! service stays authoritative. Views subscribe to snapshots and never
//! write to the cache.
//!
//! List responses can resolve out of order. Each list call takes a sequence
//! number when it starts, and a response older than the last one applied is
//! handed back to its caller but not written to the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use hm_core::task::{
    calendar_events, filter_tasks, group_by_category, CalendarEvent, CategoryGroups, ClientFilter,
    Task, TaskDraft, TaskQuery, TaskService,
};
use hm_core::Result;

/// Immutable view of the cache at one point in time
#[derive(Debug, Clone, Default)]
pub struct TaskSnapshot {
    pub tasks: Arc<Vec<Task>>,
    /// Bumped on every change to the cache
    pub version: u64,
}

impl TaskSnapshot {
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

struct SyncState {
    /// Sequence number of the last response written to the cache
    applied_seq: u64,
    /// Query of the current view, reused by refreshes
    query: TaskQuery,
}

pub struct TaskStore {
    service: Arc<dyn TaskService>,
    next_seq: AtomicU64,
    state: Mutex<SyncState>,
    snapshot_tx: watch::Sender<TaskSnapshot>,
}

impl TaskStore {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        let (snapshot_tx, _) = watch::channel(TaskSnapshot::default());
        Self {
            service,
            next_seq: AtomicU64::new(0),
            state: Mutex::new(SyncState {
                applied_seq: 0,
                query: TaskQuery::default(),
            }),
            snapshot_tx,
        }
    }

    fn take_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, tasks: Vec<Task>) {
        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.tasks = Arc::new(tasks);
            snapshot.version += 1;
        });
    }

    /// Fetch tasks matching `query` and make them the cache contents
    ///
    /// The returned list is exactly what the service sent. On failure the
    /// cache is left as it was.
    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>> {
        let seq = self.take_seq();
        let tasks = match self.service.list(&query).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Failed to list tasks: {}", e);
                return Err(e);
            }
        };

        let mut state = self.state.lock().await;
        if seq < state.applied_seq {
            debug!(
                "Discarding stale task list (request {} resolved after {})",
                seq, state.applied_seq
            );
            return Ok(tasks);
        }
        state.applied_seq = seq;
        state.query = query;
        self.publish(tasks.clone());
        debug!("Task cache replaced with {} task(s)", tasks.len());
        Ok(tasks)
    }

    /// Re-run the current view's query
    pub async fn refresh(&self) -> Result<Vec<Task>> {
        let query = self.state.lock().await.query.clone();
        self.list(query).await
    }

    /// Refresh after a successful mutation. The mutation stands even if this fails.
    async fn refresh_after(&self, action: &str) {
        if let Err(e) = self.refresh().await {
            warn!("Task list refresh after {} failed, cache kept: {}", action, e);
        }
    }

    /// Submit a new task, then refetch so the cache carries the assigned id
    pub async fn create(&self, draft: TaskDraft) -> Result<Option<String>> {
        let id = self.service.create(&draft).await.map_err(|e| {
            warn!("Failed to create task '{}': {}", draft.title, e);
            e
        })?;
        info!("Created task '{}'", draft.title);
        self.refresh_after("create").await;
        Ok(id)
    }

    /// Replace a task's fields. Any status may be written.
    pub async fn update(&self, id: &str, draft: TaskDraft) -> Result<()> {
        self.service.update(id, &draft).await.map_err(|e| {
            warn!("Failed to update task {}: {}", id, e);
            e
        })?;
        info!("Updated task {}", id);
        self.refresh_after("update").await;
        Ok(())
    }

    /// Delete a task and drop it from the cache
    ///
    /// List responses issued before the delete completed are treated as
    /// stale afterwards, so they cannot bring the task back.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.service.delete(id).await.map_err(|e| {
            warn!("Failed to delete task {}: {}", id, e);
            e
        })?;

        let seq = self.take_seq();
        let mut state = self.state.lock().await;
        state.applied_seq = seq;
        self.snapshot_tx.send_if_modified(|snapshot| {
            if snapshot.get(id).is_none() {
                return false;
            }
            let remaining: Vec<Task> = snapshot
                .tasks
                .iter()
                .filter(|task| task.id != id)
                .cloned()
                .collect();
            snapshot.tasks = Arc::new(remaining);
            snapshot.version += 1;
            true
        });
        info!("Deleted task {}", id);
        Ok(())
    }

    /// Empty the cache on logout; responses still in flight are dropped
    pub async fn clear(&self) {
        let seq = self.take_seq();
        let mut state = self.state.lock().await;
        state.applied_seq = seq;
        state.query = TaskQuery::default();
        self.publish(Vec::new());
        debug!("Task cache cleared");
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.snapshot_tx.borrow().get(id).cloned()
    }

    /// Receive a new snapshot every time the cache changes
    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Query of the current view
    pub async fn query(&self) -> TaskQuery {
        self.state.lock().await.query.clone()
    }

    pub fn grouped(&self) -> CategoryGroups {
        group_by_category(&self.snapshot().tasks)
    }

    pub fn filtered(&self, filter: &ClientFilter) -> Vec<Task> {
        filter_tasks(&self.snapshot().tasks, filter)
    }

    pub fn calendar(&self) -> Vec<CalendarEvent> {
        calendar_events(&self.snapshot().tasks)
    }
}
