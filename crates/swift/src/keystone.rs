//! Keystone v2 identity client

use async_trait::async_trait;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use ojs_core::{
    AuthError, AuthRequest, AuthResponse, Identity, Result, Settings, extract_error_message,
};

use crate::http::{build_client, network_error};

/// Identity client posting password credentials to `<identity_url>/tokens`
pub struct KeystoneClient {
    http: Client,
    identity_url: String,
    timeout: Duration,
}

impl KeystoneClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: build_client(settings)?,
            identity_url: settings.identity_url.trim_end_matches('/').to_string(),
            timeout: settings.request_timeout,
        })
    }

    fn tokens_url(&self) -> String {
        format!("{}/tokens", self.identity_url)
    }
}

#[async_trait]
impl Identity for KeystoneClient {
    async fn request_token(&self, request: &AuthRequest) -> Result<AuthResponse> {
        let url = self.tokens_url();
        tracing::debug!(%url, username = request.username(), "Requesting token");

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        tracing::debug!(status = status.as_u16(), "Identity service responded");

        decode_response(status, &body)
    }
}

/// Decode the identity response body
///
/// Error statuses usually carry a JSON error envelope, which is returned as
/// is. Any other body with an error status becomes [`AuthError::Rejected`].
fn decode_response(status: StatusCode, body: &str) -> Result<AuthResponse> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }

    match serde_json::from_str::<AuthResponse>(body) {
        Ok(response) if response.error.is_some() => Ok(response),
        _ => Err(AuthError::Rejected {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            code: status.as_u16(),
            message: extract_error_message(body),
        }
        .into()),
    }
}
