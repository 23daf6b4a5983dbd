use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::provider::IdentityProvider;

use super::session::{Session, User};
use super::state::AuthState;

/// Single source of truth for "am I logged in".
///
/// The store is constructed explicitly and shared by `Arc`. Its state lives in
/// a watch channel: `set_session` and `clear_session` are the only writers and
/// each replaces the whole [`AuthState`] in one step.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { provider, state }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every state change (for views that re-render on login/logout)
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn has_token(&self) -> bool {
        self.state.borrow().has_token()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Install a session (or none) and rederive every field from it.
    pub fn set_session(&self, session: Option<Session>) {
        let next = AuthState::from_session(session);
        debug!(
            authenticated = next.is_authenticated(),
            has_token = next.has_token(),
            "Session state updated"
        );
        self.state.send_replace(next);
    }

    pub fn clear_session(&self) {
        self.set_session(None);
    }

    /// Ask the provider for the current session and update local state.
    ///
    /// Returns `true` only when the provider returned a session. Provider
    /// errors and transport failures are logged and end in a cleared state.
    pub async fn check_session(&self) -> bool {
        match self.provider.get_session().await {
            Ok(reply) => {
                if let Some(e) = reply.error {
                    warn!(error = %e, "Session check reported an error");
                    self.clear_session();
                    return false;
                }

                match reply.session {
                    Some(session) => {
                        self.set_session(Some(session));
                        true
                    }
                    None => {
                        self.clear_session();
                        false
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Session check failed");
                self.clear_session();
                false
            }
        }
    }

    /// Sign out with the provider. Local state is cleared either way; the
    /// return value only says whether the provider accepted the sign-out.
    pub async fn logout(&self) -> bool {
        let result = match self.provider.sign_out().await {
            Ok(reply) => match reply.error {
                Some(e) => Err(e.to_string()),
                None => Ok(()),
            },
            Err(e) => Err(e.to_string()),
        };

        self.clear_session();

        match result {
            Ok(()) => {
                info!("Logged out");
                true
            }
            Err(e) => {
                error!(error = %e, "Logout failed");
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
