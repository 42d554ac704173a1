//! Authenticated session state
//!
//! A session holds the user's credentials together with the token and
//! storage endpoint handed out by the identity service. It is loaded from
//! and saved to the credential file by [`crate::CredentialStore`].

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::identity::TokenGrant;

/// Credentials and cached token for one user
///
/// `token` and `endpoint_url` are either both empty or both set.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// API username
    pub username: String,

    /// API password
    pub password: String,

    /// Tenant name sent to the identity service
    pub tenant_name: String,

    /// Tenant id returned by the identity service
    pub tenant_id: String,

    /// Cached auth token
    pub token: String,

    /// Token expiry as an RFC 3339 UTC timestamp
    pub token_expires: String,

    /// Object storage endpoint from the service catalog
    pub endpoint_url: String,
}

impl Session {
    /// Create a session holding credentials only
    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
        tenant_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            tenant_name: tenant_name.into(),
            ..Default::default()
        }
    }

    /// Whether username, password and tenant name are all present
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.tenant_name.is_empty()
    }

    /// Parsed token expiry, `None` if missing or unparsable
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.token_expires.parse().ok()
    }

    /// Decide whether the cached token must be replaced
    ///
    /// A refresh is needed when the token or endpoint is missing, when the
    /// stored expiry cannot be parsed, or when it is at or before `now`.
    pub fn needs_refresh(&self, now: Timestamp) -> bool {
        if self.token.is_empty() || self.endpoint_url.is_empty() {
            return true;
        }

        match self.expires_at() {
            Some(expires) => expires <= now,
            None => true,
        }
    }

    /// Store a freshly issued token
    pub fn apply(&mut self, grant: TokenGrant) {
        self.token = grant.token;
        self.token_expires = grant.expires.to_string();
        self.tenant_id = grant.tenant_id;
        self.endpoint_url = grant.endpoint_url;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant_name", &self.tenant_name)
            .field("tenant_id", &self.tenant_id)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("token_expires", &self.token_expires)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::ToSpan;

    fn authenticated(expires: &str) -> Session {
        Session {
            token: "tok".into(),
            token_expires: expires.into(),
            endpoint_url: "https://object.example.com/v1/AUTH_t".into(),
            ..Session::with_credentials("user", "pass", "user")
        }
    }

    #[test]
    fn test_has_credentials() {
        assert!(Session::with_credentials("u", "p", "t").has_credentials());
        assert!(!Session::with_credentials("u", "", "t").has_credentials());
        assert!(!Session::default().has_credentials());
    }

    #[test]
    fn test_needs_refresh_future_expiry() {
        let now = Timestamp::now();
        let session = authenticated(&(now + 1.hour()).to_string());
        assert!(!session.needs_refresh(now));
    }

    #[test]
    fn test_needs_refresh_expired() {
        let now = Timestamp::now();
        let session = authenticated(&(now - 1.second()).to_string());
        assert!(session.needs_refresh(now));

        // Expiry exactly at now counts as expired
        let session = authenticated(&now.to_string());
        assert!(session.needs_refresh(now));
    }

    #[test]
    fn test_needs_refresh_unparsable_expiry() {
        let session = authenticated("Mon, 02 Jan 2006 15:04:05 MST");
        assert!(session.needs_refresh(Timestamp::UNIX_EPOCH));
    }

    #[test]
    fn test_needs_refresh_missing_token_or_endpoint() {
        let now = Timestamp::now();
        let expires = (now + 1.hour()).to_string();

        let mut session = authenticated(&expires);
        session.token.clear();
        assert!(session.needs_refresh(now));

        let mut session = authenticated(&expires);
        session.endpoint_url.clear();
        assert!(session.needs_refresh(now));
    }

    #[test]
    fn test_apply_grant() {
        let mut session = Session::with_credentials("u", "p", "t");
        let expires: Timestamp = "2030-01-01T00:00:00Z".parse().unwrap();
        session.apply(TokenGrant {
            token: "abc".into(),
            expires,
            tenant_id: "tenant-1".into(),
            endpoint_url: "https://object.example.com/v1/AUTH_1".into(),
        });

        assert_eq!(session.token, "abc");
        assert_eq!(session.token_expires, "2030-01-01T00:00:00Z");
        assert_eq!(session.expires_at(), Some(expires));
        assert_eq!(session.tenant_id, "tenant-1");
        assert_eq!(session.endpoint_url, "https://object.example.com/v1/AUTH_1");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let session = authenticated("2030-01-01T00:00:00Z");
        let debug = format!("{session:?}");
        assert!(!debug.contains("pass\""));
        assert!(!debug.contains("tok\""));
        assert!(debug.contains("<redacted>"));
    }
}
