use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record as returned by the provider.
///
/// Only the fields the gate looks at are typed; everything else the provider
/// sends (metadata, identities, timestamps) is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            role: None,
            extra: Map::new(),
        }
    }
}

/// A session handed out by the identity provider.
///
/// A session always carries a user; the access token is normally present but
/// the provider can return a session without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp (seconds)
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn new(user: User, access_token: Option<String>) -> Self {
        Self {
            user,
            access_token,
            refresh_token: None,
            token_type: None,
            expires_in: None,
            expires_at: None,
        }
    }

    /// Fill in `expires_at` from `expires_in` when the provider only sent the
    /// relative lifetime. An out-of-range lifetime leaves the expiry unknown.
    pub fn with_expiry_from(mut self, issued_at: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
                .map(|expiry| expiry.timestamp());
        }
        self
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }

    /// Sessions without a known expiry never expire locally; the provider
    /// decides when it is asked.
    pub fn is_expired(&self) -> bool {
        self.expires_at()
            .map(|expiry| Utc::now() >= expiry)
            .unwrap_or(false)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_at()
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserializes_gotrue_payload() {
        let json = r#"{
            "access_token": "t1",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "refresh_token": "r1",
            "user": {
                "id": "u1",
                "email": "scout@example.com",
                "role": "authenticated",
                "aud": "authenticated",
                "app_metadata": {"provider": "email"}
            }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token.as_deref(), Some("t1"));
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.user.email.as_deref(), Some("scout@example.com"));
        assert_eq!(session.user.extra.get("aud"), Some(&Value::from("authenticated")));
        assert_eq!(session.expires_at, Some(1_700_003_600));
    }

    #[test]
    fn test_session_without_token_deserializes() {
        let session: Session = serde_json::from_str(r#"{"user":{"id":"u1"}}"#).unwrap();
        assert!(session.access_token.is_none());
        assert!(!session.is_expired());
        assert!(session.minutes_until_expiry().is_none());
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new(User::new("u1"), Some("t1".to_string()));
        session.expires_at = Some((Utc::now() - Duration::minutes(1)).timestamp());
        assert!(session.is_expired());
        assert_eq!(session.minutes_until_expiry(), Some(0));

        session.expires_at = Some((Utc::now() + Duration::minutes(30)).timestamp());
        assert!(!session.is_expired());
        assert!(session.minutes_until_expiry().unwrap() >= 29);
    }

    #[test]
    fn test_with_expiry_from_fills_missing_expires_at() {
        let issued = Utc::now();
        let mut session = Session::new(User::new("u1"), Some("t1".to_string()));
        session.expires_in = Some(3600);
        let session = session.with_expiry_from(issued);
        assert_eq!(session.expires_at, Some(issued.timestamp() + 3600));
    }

    #[test]
    fn test_with_expiry_from_out_of_range_lifetime() {
        let issued = Utc::now();
        for secs in [i64::MAX, i64::MIN, i64::MAX / 1000] {
            let mut session = Session::new(User::new("u1"), Some("t1".to_string()));
            session.expires_in = Some(secs);
            let session = session.with_expiry_from(issued);
            assert!(session.expires_at.is_none());
            assert!(!session.is_expired());
        }
    }
}
