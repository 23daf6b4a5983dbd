use super::session::{Session, User};

/// Authentication state held by the [`SessionStore`](super::SessionStore).
///
/// Every field is derived from `session` by [`AuthState::from_session`]; there
/// are no setters, so the flags can never drift from the session they
/// describe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    session: Option<Session>,
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
    has_token: bool,
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        let user = session.as_ref().map(|s| s.user.clone());
        let token = session.as_ref().and_then(|s| s.access_token.clone());
        Self {
            is_authenticated: session.is_some(),
            has_token: token.is_some(),
            session,
            user,
            token,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn has_token(&self) -> bool {
        self.has_token
    }

    /// Authenticated and holding a usable credential. This is what gating
    /// decisions use.
    pub fn is_usable(&self) -> bool {
        self.is_authenticated && self.has_token
    }
}

// ============================================================================
// Tests
// ============================================================================
