//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{Session, User};
use crate::provider::{AuthError, IdentityProvider, SessionReply, SignOutReply, TransportError};

pub fn session_with_token(user_id: &str, token: &str) -> Session {
    Session::new(User::new(user_id), Some(token.to_string()))
}

pub fn session_without_token(user_id: &str) -> Session {
    Session::new(User::new(user_id), None)
}

/// Identity provider whose answers are set by the test.
#[derive(Default)]
pub struct ScriptedProvider {
    session: Mutex<Option<Session>>,
    session_error: Mutex<Option<AuthError>>,
    sign_out_error: Mutex<Option<AuthError>>,
    unreachable: AtomicBool,
    session_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }

    pub fn fail_session_with(&self, error: AuthError) {
        *self.session_error.lock().unwrap() = Some(error);
    }

    pub fn fail_sign_out_with(&self, error: AuthError) {
        *self.sign_out_error.lock().unwrap() = Some(error);
    }

    /// Make every call fail as if the network were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), TransportError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(TransportError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn get_session(&self) -> Result<SessionReply, TransportError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        if let Some(error) = self.session_error.lock().unwrap().clone() {
            return Ok(SessionReply::error(error));
        }
        Ok(SessionReply {
            session: self.session.lock().unwrap().clone(),
            error: None,
        })
    }

    async fn sign_out(&self) -> Result<SignOutReply, TransportError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        *self.session.lock().unwrap() = None;
        Ok(SignOutReply {
            error: self.sign_out_error.lock().unwrap().clone(),
        })
    }
}
