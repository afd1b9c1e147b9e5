//! Raw task records as the services send them
//!
//! The services disagree on field names (`_id` vs `id` vs `task_id`,
//! `due_date` vs `dueDate`) and on formats (plain dates vs ISO datetimes).
//! Everything is read loosely into [`TaskRecord`] and normalized into
//! [`Task`]/[`TaskDraft`] in one place. Each spelling is its own field, so a
//! record carrying both `_id` and `id` still decodes.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::debug;

use super::model::{dedup_ids, Task, TaskCategory, TaskDraft, TaskPriority, TaskStatus};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRecord {
    #[serde(default, rename = "_id")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, rename = "dueDate")]
    pub due_date_camel: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default, rename = "startTime")]
    pub start_time_camel: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, rename = "endTime")]
    pub end_time_camel: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub recurring: Option<bool>,
}

impl TaskRecord {
    /// First non-empty of `_id`, `id` and `task_id`
    fn take_identifier(&mut self) -> Option<String> {
        [self.document_id.take(), self.id.take(), self.task_id.take()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl TryFrom<TaskRecord> for TaskDraft {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        let title = non_empty(record.title)
            .or(record.name)
            .ok_or_else(|| Error::Decode("task record has no title".into()))?;
        let due_date = non_empty(record.due_date)
            .or(record.due_date_camel)
            .as_deref()
            .ok_or_else(|| Error::Decode(format!("task '{}' has no due_date", title)))
            .and_then(parse_date)?;
        let start_time = non_empty(record.start_time)
            .or(record.start_time_camel)
            .as_deref()
            .ok_or_else(|| Error::Decode(format!("task '{}' has no start_time", title)))
            .and_then(parse_time)?;
        let end_time = non_empty(record.end_time)
            .or(record.end_time_camel)
            .as_deref()
            .ok_or_else(|| Error::Decode(format!("task '{}' has no end_time", title)))
            .and_then(parse_time)?;

        let category = match record.category.as_deref() {
            None | Some("") => None,
            Some(raw) => match raw.parse::<TaskCategory>() {
                Ok(category) => Some(category),
                Err(_) => {
                    debug!("task '{}' has unrecognized category '{}'", title, raw);
                    None
                }
            },
        };

        let status = match record.status.as_deref() {
            None | Some("") => TaskStatus::default(),
            Some(raw) => raw
                .parse::<TaskStatus>()
                .map_err(|_| Error::Decode(format!("task '{}' has unknown status '{}'", title, raw)))?,
        };

        let priority = match record.priority.as_deref() {
            None | Some("") => TaskPriority::default(),
            Some(raw) => raw.parse::<TaskPriority>().unwrap_or_else(|_| {
                debug!("task '{}' has unrecognized priority '{}'", title, raw);
                TaskPriority::default()
            }),
        };

        Ok(Self {
            title,
            description: record.description.unwrap_or_default(),
            due_date,
            start_time,
            end_time,
            category,
            status,
            priority,
            participants: dedup_ids(record.participants.unwrap_or_default()),
            owner: record.user.filter(|user| !user.is_empty()),
            recurring: record.recurring.unwrap_or(false),
        })
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(mut record: TaskRecord) -> Result<Self> {
        let id = record
            .take_identifier()
            .ok_or_else(|| Error::Decode("task record has no identifier".into()))?;
        let draft = TaskDraft::try_from(record)?;
        Ok(Task::from_draft(id, draft))
    }
}

/// Parse `YYYY-MM-DD`, or take the date part of an ISO datetime
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| Error::Decode(format!("invalid date '{}'", raw)))
}

/// Parse `HH:MM`, `HH:MM:SS`, or take the time part of an ISO datetime
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    for format in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return Ok(time);
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), format) {
            return Ok(datetime.time());
        }
    }
    Err(Error::Decode(format!("invalid time '{}'", raw)))
}

/// Serde adapter writing times as `HH:MM` (seconds only when non-zero)
pub mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = if time.second() == 0 && time.nanosecond() == 0 {
            time.format("%H:%M").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        };
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(serde::de::Error::custom)
    }
}
