//! Identity provider boundary.
//!
//! The gate treats the hosted auth service as an opaque asynchronous oracle
//! with two calls, `get_session` and `sign_out`. Each call has two failure
//! channels that callers must handle separately:
//! - the `error` field of a normal reply, for failures the provider itself
//!   reports (expired token, rejected key)
//! - the `Err` arm, for calls that never produced a reply (network, bad body)
//!
//! `SupabaseAuthClient` implements the boundary against a GoTrue server.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::auth::Session;

pub use client::{ConnectionStatus, SupabaseAuthClient};
pub use error::{AuthError, TransportError};

/// Reply to a session query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReply {
    pub session: Option<Session>,
    pub error: Option<AuthError>,
}

impl SessionReply {
    pub fn session(session: Session) -> Self {
        Self {
            session: Some(session),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn error(error: AuthError) -> Self {
        Self {
            session: None,
            error: Some(error),
        }
    }
}

/// Reply to a sign-out request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignOutReply {
    pub error: Option<AuthError>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Query the provider for the current session.
    ///
    /// "No session" is an ordinary reply with `session: None`, not an error.
    async fn get_session(&self) -> Result<SessionReply, TransportError>;

    /// End the current session with the provider.
    async fn sign_out(&self) -> Result<SignOutReply, TransportError>;
}
