//! Task model definitions

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::record::{self, TaskRecord};
use crate::{Error, Result};

/// Area of the home a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskCategory {
    #[serde(alias = "bathroom")]
    Bathroom,
    #[serde(alias = "bedroom")]
    Bedroom,
    #[serde(alias = "entireHome", alias = "entire_home", alias = "entirehome")]
    EntireHome,
    #[serde(alias = "garden")]
    Garden,
    #[serde(alias = "kitchen")]
    Kitchen,
    #[serde(alias = "laundry")]
    Laundry,
    #[serde(alias = "livingRoom", alias = "living_room", alias = "livingroom")]
    LivingRoom,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 7] = [
        Self::Bathroom,
        Self::Bedroom,
        Self::EntireHome,
        Self::Garden,
        Self::Kitchen,
        Self::Laundry,
        Self::LivingRoom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bathroom => "Bathroom",
            Self::Bedroom => "Bedroom",
            Self::EntireHome => "EntireHome",
            Self::Garden => "Garden",
            Self::Kitchen => "Kitchen",
            Self::Laundry => "Laundry",
            Self::LivingRoom => "LivingRoom",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = Error;

    /// Accepts `Kitchen`, `kitchen`, `LivingRoom`, `livingRoom`, `living_room`, ...
    fn from_str(value: &str) -> Result<Self> {
        let folded: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "bathroom" => Ok(Self::Bathroom),
            "bedroom" => Ok(Self::Bedroom),
            "entirehome" => Ok(Self::EntireHome),
            "garden" => Ok(Self::Garden),
            "kitchen" => Ok(Self::Kitchen),
            "laundry" => Ok(Self::Laundry),
            "livingroom" => Ok(Self::LivingRoom),
            _ => Err(Error::InvalidInput(format!("Unknown task category '{}'", value))),
        }
    }
}

/// Lifecycle stage of a task
///
/// Any status may be written by an update; transitions are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let folded: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "pending" => Ok(Self::Pending),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidInput(format!("Unknown task status '{}'", value))),
        }
    }
}

/// How urgent a task is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Low
    }
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(Error::InvalidInput(format!("Unknown task priority '{}'", value))),
        }
    }
}

/// Task fields as submitted to the service (everything but the id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(with = "record::time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "record::time_of_day")]
    pub end_time: NaiveTime,
    pub category: Option<TaskCategory>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub participants: Vec<String>,
    /// Id of the user who owns the task
    #[serde(rename = "user", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub recurring: bool,
}

impl TaskDraft {
    /// Create a pending draft with no participants
    pub fn new(
        title: impl Into<String>,
        due_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        category: TaskCategory,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            start_time,
            end_time,
            category: Some(category),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            participants: Vec::new(),
            owner: None,
            recurring: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the participants; repeated ids are dropped
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = dedup_ids(participants.into_iter().map(Into::into));
        self
    }

    /// Set the owner id
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Mark the task as recurring
    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Form-level checks. The store itself never calls this.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".into()));
        }
        if self.category.is_none() {
            return Err(Error::InvalidInput("Category is required".into()));
        }
        if self.end_time <= self.start_time {
            return Err(Error::InvalidInput(format!(
                "End time {} must be after start time {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

/// A household task as known to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(with = "record::time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "record::time_of_day")]
    pub end_time: NaiveTime,
    pub category: Option<TaskCategory>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub participants: Vec<String>,
    #[serde(rename = "user", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub recurring: bool,
}

impl Task {
    /// Attach a service-assigned id to a draft
    pub fn from_draft(id: impl Into<String>, draft: TaskDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            status: draft.status,
            priority: draft.priority,
            participants: draft.participants,
            owner: draft.owner,
            recurring: draft.recurring,
        }
    }

    /// The replacement body for an update of this task
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            status: self.status,
            priority: self.priority,
            participants: self.participants.clone(),
            owner: self.owner.clone(),
            recurring: self.recurring,
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

/// Drop repeated ids, keeping the first occurrence of each
pub fn dedup_ids(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
