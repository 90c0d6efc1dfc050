//! # Session/auth service
//!
//! [`AuthService`] owns the in-memory [`AuthState`] and keeps it in step with the
//! persisted session pointer and account collection.
//!
//! ## Lifecycle
//!
//! The service starts in [`AuthState::Initializing`]. [`AuthService::initialize`]
//! reads the stored session pointer once: a pointer to an existing account
//! restores [`AuthState::Authenticated`]; a pointer to a missing account is
//! cleared and the state becomes [`AuthState::Unauthenticated`]. Later calls are
//! no-ops returning the current state.
//!
//! ## Write-through
//!
//! Every operation persists first and only then publishes the new state, so a
//! subscriber never observes a state the store does not hold. `sign_out` is the
//! one exception: it publishes `Unauthenticated` even when clearing the pointer
//! fails, and hands the write error back to the caller.
//!
//! ## Observing
//!
//! [`AuthService::subscribe`] returns a [`watch::Receiver`]; the presentation layer
//! re-renders whenever it reports a change.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use store::{normalize_email, KeyValueStore, Storage, User};
use tokio::sync::watch;

use super::state::AuthState;
use crate::error::AuthError;

/// Editable profile fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
}

impl ProfileUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn apply(&self, user: &mut User) {
        user.name = self.name.trim().to_string();
    }
}

/// Sign-in, sign-up, sign-out and profile updates over a [`Storage`].
pub struct AuthService<S: KeyValueStore> {
    storage: Storage<S>,
    state: watch::Sender<AuthState>,
    started: AtomicBool,
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(storage: Storage<S>) -> Self {
        let (state, _) = watch::channel(AuthState::Initializing);
        Self {
            storage,
            state,
            started: AtomicBool::new(false),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// The signed-in account, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Resolve the stored session pointer. Runs once per service.
    pub async fn initialize(&self) -> Result<AuthState, AuthError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(self.state());
        }
        match self.restore_session().await {
            Ok(next) => {
                self.state.send_replace(next.clone());
                Ok(next)
            }
            Err(e) => {
                self.state.send_replace(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    async fn restore_session(&self) -> Result<AuthState, AuthError> {
        let Some(session_id) = self.storage.active_session_id().await? else {
            tracing::debug!("no stored session");
            return Ok(AuthState::Unauthenticated);
        };

        let users = self.storage.load_users().await?;
        match users.into_iter().find(|user| user.id == session_id) {
            Some(user) => {
                tracing::info!(user_id = %user.id, "restored session");
                Ok(AuthState::Authenticated(user))
            }
            None => {
                tracing::info!(user_id = %session_id, "session points at a missing account, clearing");
                self.storage.clear_active_session_id().await?;
                Ok(AuthState::Unauthenticated)
            }
        }
    }

    /// Sign in with a case-insensitive email and an exact password.
    ///
    /// On failure the session pointer and the published state are left untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let users = self.storage.load_users().await?;
        if users.is_empty() {
            return Err(AuthError::NoAccounts);
        }

        let email = normalize_email(email);
        let user = users
            .into_iter()
            .find(|user| user.has_email(&email) && user.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        self.storage.set_active_session_id(&user.id).await?;
        tracing::info!(user_id = %user.id, "signed in");
        self.state
            .send_replace(AuthState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Create an account and sign it in.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let mut users = self.storage.load_users().await?;
        let email = normalize_email(email);
        if users.iter().any(|user| user.has_email(&email)) {
            return Err(AuthError::DuplicateEmail);
        }

        let user = User::new(name, &email, password, Utc::now());
        users.push(user.clone());
        self.storage.save_users(&users).await?;
        self.storage.set_active_session_id(&user.id).await?;

        tracing::info!(user_id = %user.id, "registered account");
        self.state
            .send_replace(AuthState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Clear the session pointer and drop to [`AuthState::Unauthenticated`].
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let cleared = self.storage.clear_active_session_id().await;
        self.state.send_replace(AuthState::Unauthenticated);
        tracing::info!("signed out");
        cleared.map_err(AuthError::from)
    }

    /// Merge `update` into the signed-in account.
    ///
    /// Returns `Ok(None)` without touching storage when nobody is signed in.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<User>, AuthError> {
        let Some(current) = self.current_user() else {
            return Ok(None);
        };

        let mut users = self.storage.load_users().await?;
        let mut updated = None;
        for stored in users.iter_mut().filter(|stored| stored.id == current.id) {
            update.apply(stored);
            updated = Some(stored.clone());
        }
        // The account vanished from storage; keep showing what we had.
        let updated = updated.unwrap_or(current);

        self.storage.save_users(&users).await?;
        tracing::debug!(user_id = %updated.id, "updated profile");
        self.state
            .send_replace(AuthState::Authenticated(updated.clone()));
        Ok(Some(updated))
    }
}
