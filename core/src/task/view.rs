//! Derived views over a task list
//!
//! Pure functions; none of them touch the cache or the network.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::model::{Task, TaskCategory};
use super::query::ClientFilter;
use crate::user::User;

/// Shown for participant ids missing from the user list
pub const UNKNOWN_USER: &str = "Unknown User";

/// Grouping key: a category, or `Other` for tasks without one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryBucket {
    Category(TaskCategory),
    Other,
}

impl CategoryBucket {
    pub fn of(task: &Task) -> Self {
        task.category.map_or(Self::Other, Self::Category)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category(category) => category.as_str(),
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks partitioned by bucket
///
/// Buckets are kept in the order their first task appeared in the input and
/// only non-empty buckets are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroups {
    groups: Vec<(CategoryBucket, Vec<Task>)>,
}

impl CategoryGroups {
    pub fn get(&self, bucket: CategoryBucket) -> Option<&[Task]> {
        self.groups
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, tasks)| tasks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryBucket, &[Task])> + '_ {
        self.groups.iter().map(|(b, tasks)| (*b, tasks.as_slice()))
    }

    pub fn buckets(&self) -> Vec<CategoryBucket> {
        self.groups.iter().map(|(b, _)| *b).collect()
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_inner(self) -> Vec<(CategoryBucket, Vec<Task>)> {
        self.groups
    }
}

/// Partition tasks by category
pub fn group_by_category(tasks: &[Task]) -> CategoryGroups {
    let mut groups: Vec<(CategoryBucket, Vec<Task>)> = Vec::new();
    for task in tasks {
        let bucket = CategoryBucket::of(task);
        match groups.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, members)) => members.push(task.clone()),
            None => groups.push((bucket, vec![task.clone()])),
        }
    }
    CategoryGroups { groups }
}

/// Keep the tasks that satisfy every active predicate, in input order
pub fn filter_tasks(tasks: &[Task], filter: &ClientFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

/// `"{name} {last_name}"` for every participant, in participant order
///
/// Ids not found in `users` map to [`UNKNOWN_USER`], so the output always
/// has one entry per participant.
pub fn resolve_participant_names(task: &Task, users: &[User]) -> Vec<String> {
    task.participants
        .iter()
        .map(|id| {
            users
                .iter()
                .find(|user| &user.id == id)
                .map(User::display_name)
                .unwrap_or_else(|| UNKNOWN_USER.to_string())
        })
        .collect()
}

/// A task placed on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
}

/// Combine each task's due date with its start and end times
pub fn calendar_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks
        .iter()
        .map(|task| CalendarEvent {
            id: task.id.clone(),
            title: task.title.clone(),
            start: task.due_date.and_time(task.start_time),
            end: task.due_date.and_time(task.end_time),
            description: task.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskDraft, TaskStatus};
    use chrono::{NaiveDate, NaiveTime};

    fn task(id: &str, category: Option<TaskCategory>, participants: &[&str]) -> Task {
        let mut draft = TaskDraft::new(
            format!("task {}", id),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            TaskCategory::Kitchen,
        )
        .with_participants(participants.iter().copied());
        draft.category = category;
        Task::from_draft(id, draft)
    }

    fn user(id: &str, name: &str, last_name: &str) -> User {
        User {
            id: id.into(),
            username: String::new(),
            name: name.into(),
            last_name: last_name.into(),
            email: String::new(),
        }
    }

    #[test]
    fn test_group_by_category_keeps_first_appearance_order() {
        let tasks = vec![
            task("1", Some(TaskCategory::Garden), &[]),
            task("2", Some(TaskCategory::Kitchen), &[]),
            task("3", None, &[]),
            task("4", Some(TaskCategory::Garden), &[]),
        ];
        let groups = group_by_category(&tasks);

        assert_eq!(
            groups.buckets(),
            vec![
                CategoryBucket::Category(TaskCategory::Garden),
                CategoryBucket::Category(TaskCategory::Kitchen),
                CategoryBucket::Other,
            ]
        );
        let garden: Vec<&str> = groups
            .get(CategoryBucket::Category(TaskCategory::Garden))
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(garden, vec!["1", "4"]);
        assert_eq!(groups.get(CategoryBucket::Other).unwrap()[0].id, "3");
        assert!(groups.get(CategoryBucket::Category(TaskCategory::Laundry)).is_none());
    }

    #[test]
    fn test_group_by_category_loses_nothing() {
        let tasks: Vec<Task> = (0..20)
            .map(|i| {
                let category = if i % 5 == 0 {
                    None
                } else {
                    Some(TaskCategory::ALL[i % TaskCategory::ALL.len()])
                };
                task(&i.to_string(), category, &[])
            })
            .collect();
        let groups = group_by_category(&tasks);

        let mut ids: Vec<String> = groups
            .iter()
            .flat_map(|(bucket, members)| {
                for member in members {
                    assert_eq!(CategoryBucket::of(member), bucket);
                }
                members.iter().map(|t| t.id.clone())
            })
            .collect();
        ids.sort();
        let mut expected: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
        assert!(groups.iter().all(|(_, members)| !members.is_empty()));
    }

    #[test]
    fn test_group_empty_list() {
        let groups = group_by_category(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.len(), 0);
    }

    #[test]
    fn test_filter_with_unknown_participant_is_empty() {
        let tasks = vec![
            task("1", Some(TaskCategory::Kitchen), &["u1"]),
            task("2", Some(TaskCategory::Bedroom), &["u2"]),
        ];
        let filter = ClientFilter::new().participants(["u9"]);
        assert!(filter_tasks(&tasks, &filter).is_empty());
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let tasks = vec![
            task("1", Some(TaskCategory::Kitchen), &["u1"]),
            task("2", None, &[]),
        ];
        assert_eq!(filter_tasks(&tasks, &ClientFilter::new()), tasks);
    }

    #[test]
    fn test_filter_is_subset_in_order() {
        let tasks = vec![
            task("1", Some(TaskCategory::Kitchen), &["u1"]),
            task("2", Some(TaskCategory::Kitchen), &["u2"]),
            task("3", Some(TaskCategory::Kitchen), &["u2", "u1"]),
        ];
        let filtered = filter_tasks(&tasks, &ClientFilter::new().participants(["u1"]));
        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_resolve_participant_names() {
        let users = vec![user("u1", "Ann", "Lee")];
        let mut kitchen = task("1", Some(TaskCategory::Kitchen), &["u1"]);
        kitchen.status = TaskStatus::Pending;
        assert_eq!(resolve_participant_names(&kitchen, &users), vec!["Ann Lee"]);
    }

    #[test]
    fn test_resolve_participant_names_unknown_and_empty() {
        let users = vec![user("u1", "Ann", "Lee")];
        let nobody = task("1", None, &[]);
        assert!(resolve_participant_names(&nobody, &users).is_empty());

        let strangers = task("2", None, &["u7", "u8"]);
        assert_eq!(
            resolve_participant_names(&strangers, &users),
            vec![UNKNOWN_USER, UNKNOWN_USER]
        );

        let mixed = task("3", None, &["u7", "u1"]);
        let names = resolve_participant_names(&mixed, &[]);
        assert_eq!(names.len(), mixed.participants.len());
    }

    #[test]
    fn test_calendar_events() {
        let events = calendar_events(&[task("1", Some(TaskCategory::Kitchen), &[])]);
        assert_eq!(events.len(), 1);
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(events[0].start, date.and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(events[0].end, date.and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(events[0].title, "task 1");
    }
}
