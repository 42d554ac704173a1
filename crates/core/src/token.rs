//! Token acquisition and expiry caching
//!
//! A [`Session`] is either unauthenticated (no token) or authenticated
//! with a token and expiry. The only way into the authenticated state is a
//! successful [`TokenManager::authenticate`]; [`TokenManager::ensure_valid`]
//! re-authenticates when the cached token is missing or expired.

use jiff::Timestamp;

use crate::error::{Error, Result};
use crate::identity::AuthRequest;
use crate::session::Session;
use crate::traits::Identity;

/// Owns the identity client and decides when to refresh
pub struct TokenManager<I> {
    identity: I,
}

impl<I: Identity> TokenManager<I> {
    pub fn new(identity: I) -> Self {
        Self { identity }
    }

    /// Obtain a new token for the given credentials
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        tenant_name: &str,
    ) -> Result<Session> {
        tracing::debug!(username, tenant_name, "Requesting a new token");

        let request = AuthRequest::new(username, password, tenant_name);
        let response = self.identity.request_token(&request).await?;
        let grant = response.into_grant()?;

        let mut session = Session::with_credentials(username, password, tenant_name);
        session.apply(grant);

        tracing::info!(expires = %session.token_expires, "Authenticated");
        Ok(session)
    }

    /// Return a session with a usable token, refreshing it if needed
    pub async fn ensure_valid(&self, session: Session) -> Result<Session> {
        self.ensure_valid_at(session, Timestamp::now()).await
    }

    /// Same as [`Self::ensure_valid`] with an explicit clock
    pub async fn ensure_valid_at(&self, session: Session, now: Timestamp) -> Result<Session> {
        if !session.has_credentials() {
            return Err(Error::NotAuthenticated);
        }

        if !session.needs_refresh(now) {
            tracing::info!("Using the cached token.");
            return Ok(session);
        }

        self.authenticate(&session.username, &session.password, &session.tenant_name)
            .await
    }
}
