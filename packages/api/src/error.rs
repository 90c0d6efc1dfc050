//! Error types returned by the services.

use store::{StorageError, TaskId};
use thiserror::Error;

use crate::validation::ValidationError;

/// Failure of a sign-in, sign-up, sign-out or profile operation.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No account found. Please register first.")]
    NoAccounts,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("This email is already registered.")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of a task operation.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
