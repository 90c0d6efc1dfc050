//! Local account authentication and the session state machine.

mod service;
mod state;

pub use service::{AuthService, ProfileUpdate};
pub use state::AuthState;
