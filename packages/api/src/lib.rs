//! # API crate: session and task services for the task tracker
//!
//! This crate is what the presentation layer talks to. It sits on top of the
//! [`store`] crate and turns its typed persistence into the operations the
//! screens call, plus the form validation they run first.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | `AuthService` state machine (`Initializing` → `Unauthenticated` / `Authenticated`), sign-in/up/out, profile updates |
//! | [`tasks`] | `TaskService` CRUD over a user's task list, plus sorting, filtering, search and counters |
//! | [`validation`] | Minimum-length and email-shape rules for the forms |
//! | [`app`] | `AppContext` wiring everything over one store, and the platform store constructor |
//! | [`error`] | `AuthError` and `TaskError` |
//!
//! ## Observing changes
//!
//! Screens subscribe instead of polling: `AuthService::subscribe` hands out a
//! `tokio::sync::watch` receiver of the auth state, `TaskService::subscribe` a
//! `tokio::sync::broadcast` receiver of task events.

pub mod app;
pub mod auth;
pub mod error;
pub mod tasks;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use app::AppContext;
#[cfg(any(not(target_arch = "wasm32"), feature = "web"))]
pub use app::{default_store, open_default};
pub use auth::{AuthService, AuthState, ProfileUpdate};
pub use error::{AuthError, TaskError};
pub use tasks::{TaskEvent, TaskFilter, TaskService, TaskStats};
pub use validation::{ValidationError, Validator};

pub use store::{AppConfig, Task, TaskId, User, UserId};
