//! Authentication state observed by the presentation layer.

use store::User;

/// Where the session currently stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AuthState {
    /// Startup; the stored session pointer has not been read yet.
    #[default]
    Initializing,
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, AuthState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}
