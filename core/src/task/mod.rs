//! Task module
//!
//! This module contains task-related types and logic.

mod file_store;
mod model;
mod query;
pub mod record;
mod service;
pub mod view;

pub use file_store::FileTaskStore;
pub use model::*;
pub use query::{ClientFilter, TaskQuery};
pub use record::TaskRecord;
pub use service::TaskService;
pub use view::{
    calendar_events, filter_tasks, group_by_category, resolve_participant_names, CalendarEvent,
    CategoryBucket, CategoryGroups, UNKNOWN_USER,
};
