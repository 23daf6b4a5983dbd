use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// An error the identity provider reported while still answering the call
/// normally (bad credentials, expired or malformed token, rejected API key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.code) {
            (Some(status), Some(code)) => write!(f, "{} ({}, {})", self.message, status, code),
            (Some(status), None) => write!(f, "{} ({})", self.message, status),
            (None, Some(code)) => write!(f, "{} ({})", self.message, code),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AuthError {}

/// GoTrue has shipped several error body shapes over the years.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    error_code: Option<String>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Build an error from a non-success response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed.error_code.or_else(|| parsed.error.clone());
        let message = parsed
            .msg
            .or(parsed.error_description)
            .or(parsed.message)
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    Self::truncate_body(body)
                }
            });

        Self {
            status: Some(status.as_u16()),
            code,
            message,
        }
    }

    /// True when the provider rejected the credentials themselves rather
    /// than the request (expired or revoked token, bad key).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

/// The call never produced a provider answer.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// True for failures where the server could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        match self {
            TransportError::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            TransportError::Unavailable(_) => true,
            TransportError::InvalidResponse(_) => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
