//! Task collection operations and display helpers.

mod service;
mod view;

pub use service::{TaskEvent, TaskService};
pub use view::{filter, matches_query, sort_by_recency, visible_tasks, TaskFilter, TaskStats};
