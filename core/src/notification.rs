//! Email notifications about tasks

use serde::{Deserialize, Serialize};

use crate::task::Task;
use crate::user::User;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailNotification {
    pub subject: String,
    pub recipients: Vec<String>,
    pub body: String,
}

impl EmailNotification {
    pub fn new(
        subject: impl Into<String>,
        recipients: Vec<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            recipients,
            body: body.into(),
        }
    }

    /// Notify a task's participants. Participants without a known email are skipped.
    pub fn for_task(task: &Task, users: &[User]) -> Self {
        let recipients = task
            .participants
            .iter()
            .filter_map(|id| users.iter().find(|user| &user.id == id))
            .map(|user| user.email.clone())
            .filter(|email| !email.is_empty())
            .collect();

        let body = format!(
            "{}\n\nDue {} from {} to {}.\n\n{}",
            task.title,
            task.due_date.format("%Y-%m-%d"),
            task.start_time.format("%H:%M"),
            task.end_time.format("%H:%M"),
            task.description
        );

        Self::new(format!("Task reminder: {}", task.title), recipients, body.trim_end().to_string())
    }

    /// Reject empty recipient lists and addresses without a domain
    pub fn validate(&self) -> Result<()> {
        if self.recipients.is_empty() {
            return Err(Error::InvalidInput("Notification has no recipients".into()));
        }
        for recipient in &self.recipients {
            let valid = recipient
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
                .unwrap_or(false);
            if !valid {
                return Err(Error::InvalidInput(format!(
                    "Invalid recipient address '{}'",
                    recipient
                )));
            }
        }
        Ok(())
    }
}
