//! # Record models for accounts and tasks
//!
//! Defines the data structures persisted by [`crate::Storage`]. Every type is
//! `Serialize + Deserialize` with camelCase field names so the stored JSON keeps
//! the on-device layout the mobile app has always written:
//!
//! ```json
//! {"id":"…","name":"Ada","email":"ada@x.com","password":"secret1","createdAt":"2024-05-01T09:00:00Z"}
//! {"id":"…","title":"Buy seeds","notes":"tomatoes","completed":false,"createdAt":"…","updatedAt":"…"}
//! ```
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A local account. `email` is stored lower-cased and never changes; only `name` is mutable. |
//! | [`Task`] | One entry of a user's task list. `updated_at` moves forward on every mutation. |
//! | [`UserId`] / [`TaskId`] | Opaque string identifiers, freshly generated from a UUID v4 but accepting any stored string. |
//!
//! ## Helper functions
//!
//! - [`normalize_email`]: trims and lower-cases an address before comparison or storage.
//! - [`normalize_notes`]: trims free text and collapses blank input to `None`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a [`User`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a [`Task`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A local account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Display name, editable from the profile screen.
    pub name: String,
    /// Lower-cased address, unique across all accounts.
    pub email: String,
    /// Stored and compared as entered.
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new account with a generated id. `email` is normalised here.
    pub fn new(name: &str, email: &str, password: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password.to_string(),
            created_at: now,
        }
    }

    /// Case-insensitive email comparison against already-normalised input.
    pub fn has_email(&self, normalized_email: &str) -> bool {
        self.email.to_lowercase() == normalized_email
    }

    /// Up to two upper-cased initials for an avatar badge, `"U"` when the name is blank.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }

    /// First word of the display name, for greetings.
    pub fn first_name(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }
}

/// A single entry of a user's task list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a pending task with a generated id and both timestamps set to `now`.
    pub fn new(title: &str, notes: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::generate(),
            title: title.trim().to_string(),
            notes: notes.and_then(normalize_notes),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. The new value is always strictly later than the old one.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }
}

/// Trim and lower-case an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim free text; blank input becomes `None`.
pub fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
