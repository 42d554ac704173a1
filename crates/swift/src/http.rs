//! Shared reqwest plumbing

use ojs_core::{Error, Result, Settings};
use reqwest::Client;
use reqwest::header::HeaderMap;

/// Build an HTTP client with the configured timeouts
///
/// The client only bounds connecting and stalled reads. Requests that do
/// not transfer object content add `settings.request_timeout` themselves.
pub(crate) fn build_client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("ojs/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(settings.connect_timeout)
        .read_timeout(settings.read_timeout)
        .build()
        .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))
}

/// Map a transport failure to [`Error::Network`]
pub(crate) fn network_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Network(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        Error::Network(format!("Connection failed: {e}"))
    } else {
        Error::Network(format!("Request failed: {e}"))
    }
}

/// Flatten response headers into `(name, value)` pairs
///
/// Only the first value of a repeated header is kept. Values that are not
/// valid UTF-8 are skipped.
pub(crate) fn collect_headers(map: &HeaderMap) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(map.keys_len());
    for name in map.keys() {
        if let Some(value) = map.get(name).and_then(|v| v.to_str().ok()) {
            headers.push((name.as_str().to_string(), value.to_string()));
        }
    }
    headers
}
