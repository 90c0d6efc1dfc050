//! Pure helpers that shape a task collection for display.

use serde::{Deserialize, Serialize};
use store::Task;

/// Most recently updated first. Ties keep their input order.
pub fn sort_by_recency(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    tasks
}

/// Tasks matching `predicate`, in input order. The input is left untouched.
pub fn filter<P>(tasks: &[Task], predicate: P) -> Vec<Task>
where
    P: Fn(&Task) -> bool,
{
    tasks.iter().filter(|task| predicate(task)).cloned().collect()
}

/// The status chips on the task list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Done => task.completed,
        }
    }
}

/// Case-insensitive substring search over title and notes. A blank query matches everything.
pub fn matches_query(task: &Task, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(&query)
        || task
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(&query))
}

/// What the list screen shows: status filter, then search, then recency order.
pub fn visible_tasks(tasks: &[Task], status: TaskFilter, query: &str) -> Vec<Task> {
    let shown = filter(tasks, |task| status.matches(task) && matches_query(task, query));
    sort_by_recency(shown)
}

/// Counters for the list header and the profile card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }
}
