//! Swift client implementation
//!
//! Wraps a reqwest client and implements the ObjectStore trait from ojs-core.
//! Object content is streamed between the network and local files.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Method, RequestBuilder, Response, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use ojs_core::{
    Error, ObjectStore, Result, Session, Settings, StorageItem, build_storage_url,
    classify_status, extract_error_message,
};

use crate::http::{build_client, collect_headers, network_error};

/// Header carrying the token on every storage request
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Listing query parameter: continue after this name
const MARKER_PARAM: &str = "marker";

const UPLOAD_BUFFER_SIZE: usize = 64 * 1024;

/// Swift client bound to one endpoint and token
pub struct SwiftClient {
    http: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl SwiftClient {
    /// Create a client from an authenticated session
    pub fn new(session: &Session, settings: &Settings) -> Result<Self> {
        if session.token.is_empty() || session.endpoint_url.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        Ok(Self {
            http: build_client(settings)?,
            endpoint: session.endpoint_url.clone(),
            token: session.token.clone(),
            timeout: settings.request_timeout,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        build_storage_url(&self.endpoint, &[path])
    }

    /// Start a request carrying the token
    ///
    /// Object transfers use this directly and are bounded by the client's
    /// read timeout. Everything else goes through [`Self::bounded`].
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "Sending request");
        self.http
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, &self.token)
    }

    /// Start a request limited by the total request timeout
    fn bounded(&self, method: Method, url: Url) -> RequestBuilder {
        self.request(method, url).timeout(self.timeout)
    }

    /// Send one request and classify the response status
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        tracing::debug!(status, "Received response");

        if status < 400 {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status, "Cannot read the error body: {e}");
                String::new()
            }
        };
        classify_status(target_name(path), status, &body)?;
        Err(Error::Server {
            status,
            message: extract_error_message(&body),
        })
    }
}

fn target_name(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

/// Split a plain text listing into names, one per line
fn parse_listing(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write a response body to `file` chunk by chunk
async fn copy_body(mut response: Response, file: &mut File) -> Result<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(network_error)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl ObjectStore for SwiftClient {
    async fn stat(&self, path: &str) -> Result<StorageItem> {
        let request = self.bounded(Method::HEAD, self.url(path)?);
        let response = self.send(path, request).await?;
        let headers = collect_headers(response.headers());
        StorageItem::from_headers(path, &headers)
    }

    /// Follows `marker` until the server returns an empty page
    async fn list(&self, path: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        loop {
            let mut url = self.url(path)?;
            if let Some(last) = names.last() {
                url.query_pairs_mut().append_pair(MARKER_PARAM, last);
            }

            let response = self.send(path, self.bounded(Method::GET, url)).await?;
            let body = response.text().await.map_err(network_error)?;
            let page = parse_listing(&body);

            // A server that ignores the marker would repeat the last page
            if page.is_empty() || page.last() == names.last() {
                break;
            }
            tracing::debug!(path, entries = page.len(), "Listing page");
            names.extend(page);
        }

        Ok(names)
    }

    async fn get_object(&self, path: &str, dest: &Path) -> Result<u64> {
        let request = self.request(Method::GET, self.url(path)?);
        let response = self.send(path, request).await?;

        let mut file = File::create(dest).await?;
        match copy_body(response, &mut file).await {
            Ok(written) => Ok(written),
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    tracing::debug!(dest = %dest.display(), "Cannot remove partial file: {rm}");
                }
                Err(e)
            }
        }
    }

    async fn put_object(&self, path: &str, source: &Path, content_type: &str) -> Result<u64> {
        let file = File::open(source).await?;
        let size = file.metadata().await?.len();
        let stream = ReaderStream::with_capacity(file, UPLOAD_BUFFER_SIZE);

        let request = self
            .request(Method::PUT, self.url(path)?)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(stream));
        self.send(path, request).await?;
        Ok(size)
    }

    async fn put_container(&self, path: &str, headers: Vec<(String, String)>) -> Result<()> {
        let mut request = self.bounded(Method::PUT, self.url(path)?);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        self.send(path, request.body(Vec::new())).await?;
        Ok(())
    }

    async fn post(&self, path: &str, headers: Vec<(String, String)>) -> Result<()> {
        let mut request = self.bounded(Method::POST, self.url(path)?);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        self.send(path, request.body(Vec::new())).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let request = self.bounded(Method::DELETE, self.url(path)?);
        self.send(path, request).await?;
        Ok(())
    }
}
