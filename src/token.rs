//! The grant payload stored in the `data` column.
//!
//! The storage layer treats this as an opaque blob: it is serialized once at
//! create time and only read back on lookups. Field semantics (scopes,
//! client ids, redirect URIs) belong to the authorization server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One issued grant: the client/user context plus up to three credential
/// facets (authorization code, access token, refresh token), each with its
/// creation instant and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    pub client_id: String,
    pub user_id: String,
    pub redirect_uri: String,
    pub scope: String,

    pub code: String,
    pub code_create_at: DateTime<Utc>,
    pub code_expires_in: Duration,

    pub access: String,
    pub access_create_at: DateTime<Utc>,
    pub access_expires_in: Duration,

    pub refresh: String,
    pub refresh_create_at: DateTime<Utc>,
    pub refresh_expires_in: Duration,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            user_id: String::new(),
            redirect_uri: String::new(),
            scope: String::new(),
            code: String::new(),
            code_create_at: DateTime::UNIX_EPOCH,
            code_expires_in: Duration::ZERO,
            access: String::new(),
            access_create_at: DateTime::UNIX_EPOCH,
            access_expires_in: Duration::ZERO,
            refresh: String::new(),
            refresh_create_at: DateTime::UNIX_EPOCH,
            refresh_expires_in: Duration::ZERO,
        }
    }
}

impl Token {
    /// Absolute code expiry as unix seconds.
    pub fn code_expires_at(&self) -> i64 {
        self.code_create_at.timestamp() + self.code_expires_in.as_secs() as i64
    }

    /// Absolute access-token expiry as unix seconds.
    pub fn access_expires_at(&self) -> i64 {
        self.access_create_at.timestamp() + self.access_expires_in.as_secs() as i64
    }

    /// Absolute refresh-token expiry as unix seconds.
    pub fn refresh_expires_at(&self) -> i64 {
        self.refresh_create_at.timestamp() + self.refresh_expires_in.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_json() {
        let token = Token {
            client_id: "client-7".to_string(),
            user_id: "user-42".to_string(),
            redirect_uri: "http://localhost/cb".to_string(),
            scope: "read write".to_string(),
            access: "at-1".to_string(),
            access_create_at: Utc::now(),
            access_expires_in: Duration::from_secs(3600),
            refresh: "rt-1".to_string(),
            refresh_create_at: Utc::now(),
            refresh_expires_in: Duration::from_secs(86400),
            ..Default::default()
        };

        let blob = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&blob).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn partial_blob_fills_defaults() {
        let back: Token = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert_eq!(back.user_id, "u1");
        assert!(back.code.is_empty());
        assert_eq!(back.access_expires_in, Duration::ZERO);
    }

    #[test]
    fn expiry_is_create_at_plus_lifetime() {
        let token = Token {
            code: "c".to_string(),
            code_create_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            code_expires_in: Duration::from_secs(300),
            ..Default::default()
        };
        assert_eq!(token.code_expires_at(), 1_700_000_300);
    }
}
