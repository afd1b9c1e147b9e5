//! Task filters
//!
//! [`TaskQuery`] is what the task service can filter on and travels as
//! query parameters. [`ClientFilter`] covers what the service cannot do
//! and is applied to an already-fetched list.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Task, TaskCategory, TaskPriority, TaskStatus};

/// Server-side filter set. `None` fields put no restriction on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// Keep tasks this user participates in
    #[serde(default, rename = "user", skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<String>,
    /// Keep tasks due on or before this date
    #[serde(default, rename = "due_date", skip_serializing_if = "Option::is_none")]
    pub due_on_or_before: Option<NaiveDate>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_user_id = Some(user_id.into());
        self
    }

    pub fn due_on_or_before(mut self, date: NaiveDate) -> Self {
        self.due_on_or_before = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Query parameters for `GET /tasks`, only for the fields that are set
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(user) = &self.assigned_user_id {
            pairs.push(("user", user.clone()));
        }
        if let Some(date) = self.due_on_or_before {
            pairs.push(("due_date", date.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    /// How a service applies this query to a stored task
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(category) = self.category {
            if task.category != Some(category) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(user) = &self.assigned_user_id {
            if !task.has_participant(user) {
                return false;
            }
        }
        if let Some(bound) = self.due_on_or_before {
            if task.due_date > bound {
                return false;
            }
        }
        true
    }
}

/// Filters applied client-side to a fetched list. Both predicates are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Keep tasks sharing at least one participant with this set; empty = all
    pub participant_user_ids: HashSet<String>,
    /// Keep tasks due on or before this date; `None` = all
    pub due_on_or_before: Option<NaiveDate>,
}

impl ClientFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participant_user_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn due_on_or_before(mut self, date: NaiveDate) -> Self {
        self.due_on_or_before = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.participant_user_ids.is_empty() && self.due_on_or_before.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let participants_ok = self.participant_user_ids.is_empty()
            || task
                .participants
                .iter()
                .any(|p| self.participant_user_ids.contains(p));
        let due_ok = self
            .due_on_or_before
            .map_or(true, |bound| task.due_date <= bound);
        participants_ok && due_ok
    }
}
