//! GoTrue (Supabase Auth) REST client.
//!
//! The session lives in memory only. `get_session` verifies the held access
//! token against `/auth/v1/user` so every refresh is a real round trip to the
//! provider.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::{Session, User};
use crate::config::Config;

use super::{AuthError, IdentityProvider, SessionReply, SignOutReply, TransportError};

/// Header carrying the project's public anon key on every request
const API_KEY_HEADER: &str = "apikey";

/// Result of the startup connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The auth server answered (possibly with an error that is normal when
    /// nobody is signed in).
    Connected,
    /// The server rejected the project configuration (bad anon key or JWT).
    Rejected(String),
    /// The server could not be reached.
    Unreachable(String),
    /// Anything else.
    Failed(String),
}

impl ConnectionStatus {
    pub fn classify(result: std::result::Result<Option<AuthError>, TransportError>) -> Self {
        match result {
            Ok(None) => ConnectionStatus::Connected,
            Ok(Some(error)) => {
                if error.message.contains("Invalid API key") || error.message.contains("JWT") {
                    ConnectionStatus::Rejected(error.message)
                } else {
                    ConnectionStatus::Connected
                }
            }
            Err(error) => {
                let message = error.to_string();
                let lower = message.to_lowercase();
                if error.is_connectivity() || lower.contains("fetch") || lower.contains("network") {
                    ConnectionStatus::Unreachable(message)
                } else {
                    ConnectionStatus::Failed(message)
                }
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

/// Supabase Auth client.
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl SupabaseAuthClient {
    /// Create a new client for the configured project
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.supabase_url.clone(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// The session currently held by the client, without contacting the server.
    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Sign in with email and password.
    ///
    /// On success the session is held by the client and returned. A rejected
    /// login is reported in the reply's `error` field and leaves any existing
    /// session untouched.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<SessionReply, TransportError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header(API_KEY_HEADER, &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = Self::error_from(response).await?;
            warn!(%email, error = %error, "Sign in rejected");
            return Ok(SessionReply::error(error));
        }

        let session: Session = Self::parse(response).await?;
        let session = session.with_expiry_from(Utc::now());
        *self.session.write().await = Some(session.clone());

        info!(user_id = %session.user.id, "Signed in");
        Ok(SessionReply::session(session))
    }

    /// Check that the auth server is reachable and accepts the anon key.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let status = ConnectionStatus::classify(self.fetch_settings().await);
        debug!(?status, "Connection check finished");
        status
    }

    async fn fetch_settings(&self) -> std::result::Result<Option<AuthError>, TransportError> {
        let response = self
            .client
            .get(self.auth_url("settings"))
            .header(API_KEY_HEADER, &self.anon_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(None)
        } else {
            Self::error_from(response).await.map(Some)
        }
    }

    /// Drop the held session, but only if it is still the one identified by
    /// `token`. A concurrent sign-in or sign-out wins over a stale verdict.
    async fn drop_session_if(&self, token: &str) {
        let mut guard = self.session.write().await;
        if guard.as_ref().and_then(|s| s.access_token.as_deref()) == Some(token) {
            *guard = None;
        }
    }

    async fn error_from(response: Response) -> std::result::Result<AuthError, TransportError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(AuthError::from_status(status, &body))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> std::result::Result<T, TransportError> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TransportError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn get_session(&self) -> std::result::Result<SessionReply, TransportError> {
        let Some(current) = self.current_session().await else {
            return Ok(SessionReply::empty());
        };

        let Some(token) = current.access_token.clone() else {
            // Nothing to verify; hand the session back as-is.
            return Ok(SessionReply::session(current));
        };

        if current.is_expired() {
            self.drop_session_if(&token).await;
            return Ok(SessionReply::error(AuthError::new("Session expired")));
        }

        let response = self
            .client
            .get(self.auth_url("user"))
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let user: User = Self::parse(response).await?;
            let mut verified = current;
            verified.user = user;

            // A sign-in may have replaced the held session meanwhile; only
            // refresh it if it is still the one that was verified.
            let mut guard = self.session.write().await;
            if let Some(held) = guard.as_mut() {
                if held.access_token.as_deref() == Some(token.as_str()) {
                    held.user = verified.user.clone();
                }
            }
            return Ok(SessionReply::session(verified));
        }

        let error = Self::error_from(response).await?;
        if status.is_client_error() {
            self.drop_session_if(&token).await;
            Ok(SessionReply::error(error))
        } else {
            Err(TransportError::Unavailable(error.to_string()))
        }
    }

    async fn sign_out(&self) -> std::result::Result<SignOutReply, TransportError> {
        let held = self.session.write().await.take();
        let Some(token) = held.and_then(|s| s.access_token) else {
            return Ok(SignOutReply::default());
        };

        let response = self
            .client
            .post(self.auth_url("logout"))
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status().is_success() {
            info!("Signed out");
            Ok(SignOutReply::default())
        } else {
            Ok(SignOutReply {
                error: Some(Self::error_from(response).await?),
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
