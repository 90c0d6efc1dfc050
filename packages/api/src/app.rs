//! # Application context
//!
//! [`AppContext`] is built once at process start and handed to the presentation
//! layer. It owns the configuration, the [`AuthService`], the [`TaskService`] and
//! the form [`Validator`]; both services share one [`Storage`] handle over the
//! same backend.
//!
//! [`open_default`] picks the platform backend:
//! - **Web** (WASM + `web` feature): IndexedDB via [`store::IdbStore`]
//! - **Desktop / Mobile** (native): filesystem via [`store::FileStore`] under
//!   `storage.data_dir`, or `<data_dir>/dailytask` when unset

use store::{AppConfig, KeyValueStore, Storage, StorageKeys, User};

use crate::auth::{AuthService, AuthState};
use crate::error::AuthError;
use crate::tasks::TaskService;
use crate::validation::Validator;

/// Everything the screens need, wired over one store.
pub struct AppContext<S: KeyValueStore + Clone> {
    config: AppConfig,
    auth: AuthService<S>,
    tasks: TaskService<S>,
    validator: Validator,
}

impl<S: KeyValueStore + Clone> AppContext<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        let storage = Storage::with_keys(store, StorageKeys::new(config.storage.key_prefix.clone()));
        let validator = Validator::new(config.validation.clone());
        Self {
            auth: AuthService::new(storage.clone()),
            tasks: TaskService::new(storage, validator.clone()),
            validator,
            config,
        }
    }

    /// Build the context and resolve the stored session.
    pub async fn start(store: S, config: AppConfig) -> Result<Self, AuthError> {
        let app = Self::new(store, config);
        let state = app.auth.initialize().await?;
        tracing::info!(authenticated = state.is_authenticated(), "app started");
        Ok(app)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthService<S> {
        &self.auth
    }

    pub fn tasks(&self) -> &TaskService<S> {
        &self.tasks
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn state(&self) -> AuthState {
        self.auth.state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }
}

/// The platform-appropriate backing store for `config`.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn default_store(_config: &AppConfig) -> store::IdbStore {
    store::IdbStore::new()
}

/// The platform-appropriate backing store for `config`.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store(config: &AppConfig) -> store::FileStore {
    let base = config.storage.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("dailytask")
    });
    store::FileStore::new(base)
}

/// Start the app over the platform-appropriate store.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub async fn open_default(config: AppConfig) -> Result<AppContext<store::IdbStore>, AuthError> {
    AppContext::start(default_store(&config), config).await
}

/// Start the app over the platform-appropriate store.
#[cfg(not(target_arch = "wasm32"))]
pub async fn open_default(config: AppConfig) -> Result<AppContext<store::FileStore>, AuthError> {
    AppContext::start(default_store(&config), config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ProfileUpdate;
    use crate::tasks::{visible_tasks, TaskFilter};
    use store::MemoryStore;

    #[tokio::test]
    async fn test_full_session_over_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_data_dir(dir.path().to_path_buf());

        let user = {
            let app = open_default(config.clone()).await.unwrap();
            assert_eq!(app.state(), AuthState::Unauthenticated);

            let user = app.auth().sign_up("Ada", "Ada@X.com", "secret1").await.unwrap();
            app.tasks()
                .create_task(&user.id, "Buy seeds", Some("tomatoes"))
                .await
                .unwrap();
            user
        };

        // Next launch restores the session and the tasks
        let app = open_default(config).await.unwrap();
        assert_eq!(app.current_user(), Some(user.clone()));
        let listed = app.tasks().list_tasks(&user.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].notes.as_deref(), Some("tomatoes"));
    }

    #[tokio::test]
    async fn test_config_drives_keys_and_limits() {
        let store = MemoryStore::new();
        let mut config = AppConfig::default().with_key_prefix("dev_");
        config.validation.min_title_length = 1;

        let app = AppContext::start(store.clone(), config).await.unwrap();
        let user = app.auth().sign_up("Ada", "ada@x.com", "secret1").await.unwrap();
        app.tasks().create_task(&user.id, "x", None).await.unwrap();

        assert!(store.get_item("dev_users").await.unwrap().is_some());
        assert!(store
            .get_item(&format!("dev_tasks_{}", user.id))
            .await
            .unwrap()
            .is_some());
        assert!(store.get_item("@tm_users").await.unwrap().is_none());
        assert_eq!(app.validator().limits().min_title_length, 1);
        assert_eq!(app.config().storage.key_prefix, "dev_");
    }

    #[tokio::test]
    async fn test_profile_and_task_views() {
        let app = AppContext::start(MemoryStore::new(), AppConfig::default())
            .await
            .unwrap();
        let user = app.auth().sign_up("ada", "ada@x.com", "secret1").await.unwrap();

        app.auth()
            .update_profile(&ProfileUpdate::name("Ada Lovelace"))
            .await
            .unwrap();
        assert_eq!(app.current_user().unwrap().initials(), "AL");

        let seeds = app.tasks().create_task(&user.id, "Buy seeds", None).await.unwrap();
        app.tasks().create_task(&user.id, "Water beds", None).await.unwrap();
        app.tasks().toggle_completed(&user.id, &seeds.id).await.unwrap();

        let all = app.tasks().list_tasks(&user.id).await.unwrap();
        let done = visible_tasks(&all, TaskFilter::Done, "");
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, seeds.id);
        let pending = visible_tasks(&all, TaskFilter::Pending, "water");
        assert_eq!(pending.len(), 1);
        // Toggled task was touched last
        assert_eq!(visible_tasks(&all, TaskFilter::All, "")[0].id, seeds.id);
    }
}
