//! # Task service
//!
//! CRUD over one user's task collection. Every mutation loads the whole
//! collection, changes it in memory and writes it back with a single
//! [`Storage::save_tasks`] call.
//!
//! | Method | Stored effect |
//! |--------|---------------|
//! | [`list_tasks`](TaskService::list_tasks) | none |
//! | [`create_task`](TaskService::create_task) | new pending task prepended |
//! | [`update_task`](TaskService::update_task) | replaced in place, or prepended when the id is gone |
//! | [`toggle_completed`](TaskService::toggle_completed) | `completed` flipped |
//! | [`delete_task`](TaskService::delete_task) | removed; nothing written when absent |
//!
//! Successful mutations are announced as [`TaskEvent`]s to subscribers.

use chrono::Utc;
use store::{normalize_notes, KeyValueStore, Storage, Task, TaskId, UserId};
use tokio::sync::broadcast;

use super::view::TaskStats;
use crate::error::TaskError;
use crate::validation::Validator;

const EVENT_CAPACITY: usize = 64;

/// A change to some user's task collection.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskEvent {
    Created { user_id: UserId, task: Task },
    Updated { user_id: UserId, task: Task },
    Deleted { user_id: UserId, task_id: TaskId },
}

impl TaskEvent {
    pub fn user_id(&self) -> &UserId {
        match self {
            TaskEvent::Created { user_id, .. }
            | TaskEvent::Updated { user_id, .. }
            | TaskEvent::Deleted { user_id, .. } => user_id,
        }
    }
}

/// Task operations scoped by user id.
pub struct TaskService<S: KeyValueStore> {
    storage: Storage<S>,
    validator: Validator,
    events: broadcast::Sender<TaskEvent>,
}

impl<S: KeyValueStore> TaskService<S> {
    pub fn new(storage: Storage<S>, validator: Validator) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            validator,
            events,
        }
    }

    /// Subscribe to task changes for every user.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: TaskEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    /// The stored collection, as stored.
    pub async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        Ok(self.storage.load_tasks(user_id).await?)
    }

    /// Counters over the stored collection.
    pub async fn stats(&self, user_id: &UserId) -> Result<TaskStats, TaskError> {
        let tasks = self.storage.load_tasks(user_id).await?;
        Ok(TaskStats::from_tasks(&tasks))
    }

    /// Add a pending task at the front of the collection.
    pub async fn create_task(
        &self,
        user_id: &UserId,
        title: &str,
        notes: Option<&str>,
    ) -> Result<Task, TaskError> {
        self.validator.validate_task_title(title)?;

        let mut tasks = self.storage.load_tasks(user_id).await?;
        let task = Task::new(title, notes, Utc::now());
        tasks.insert(0, task.clone());
        self.storage.save_tasks(user_id, &tasks).await?;

        tracing::debug!(user_id = %user_id, task_id = %task.id, "created task");
        self.publish(TaskEvent::Created {
            user_id: user_id.clone(),
            task: task.clone(),
        });
        Ok(task)
    }

    /// Save an edited task.
    ///
    /// Title and notes are normalised and `updated_at` refreshed. If the id is
    /// no longer stored the edit is prepended as a new entry rather than lost.
    pub async fn update_task(&self, user_id: &UserId, mut task: Task) -> Result<Task, TaskError> {
        self.validator.validate_task_title(&task.title)?;

        let mut tasks = self.storage.load_tasks(user_id).await?;
        task.title = task.title.trim().to_string();
        task.notes = task.notes.as_deref().and_then(normalize_notes);

        match tasks.iter_mut().find(|stored| stored.id == task.id) {
            Some(stored) => {
                task.created_at = stored.created_at;
                task.updated_at = task.updated_at.max(stored.updated_at);
                task.touch(Utc::now());
                *stored = task.clone();
            }
            None => {
                tracing::debug!(task_id = %task.id, "edited task no longer stored, re-inserting");
                task.touch(Utc::now());
                tasks.insert(0, task.clone());
            }
        }
        self.storage.save_tasks(user_id, &tasks).await?;

        tracing::debug!(user_id = %user_id, task_id = %task.id, "updated task");
        self.publish(TaskEvent::Updated {
            user_id: user_id.clone(),
            task: task.clone(),
        });
        Ok(task)
    }

    /// Flip `completed` and refresh `updated_at`.
    pub async fn toggle_completed(&self, user_id: &UserId, task_id: &TaskId) -> Result<Task, TaskError> {
        let mut tasks = self.storage.load_tasks(user_id).await?;
        let stored = tasks
            .iter_mut()
            .find(|stored| &stored.id == task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.clone()))?;
        stored.completed = !stored.completed;
        stored.touch(Utc::now());
        let task = stored.clone();
        self.storage.save_tasks(user_id, &tasks).await?;

        tracing::debug!(user_id = %user_id, task_id = %task.id, completed = task.completed, "toggled task");
        self.publish(TaskEvent::Updated {
            user_id: user_id.clone(),
            task: task.clone(),
        });
        Ok(task)
    }

    /// Remove a task. Returns whether anything was removed.
    pub async fn delete_task(&self, user_id: &UserId, task_id: &TaskId) -> Result<bool, TaskError> {
        let mut tasks = self.storage.load_tasks(user_id).await?;
        let before = tasks.len();
        tasks.retain(|stored| &stored.id != task_id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.storage.save_tasks(user_id, &tasks).await?;

        tracing::debug!(user_id = %user_id, task_id = %task_id, "deleted task");
        self.publish(TaskEvent::Deleted {
            user_id: user_id.clone(),
            task_id: task_id.clone(),
        });
        Ok(true)
    }
}
