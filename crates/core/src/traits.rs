//! Transport traits
//!
//! These traits define the interface to the identity service and to Swift
//! object storage. They allow the session logic to be decoupled from the
//! HTTP client implementation and mocked in tests.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::{AuthRequest, AuthResponse};
use crate::item::StorageItem;

/// Trait for the identity (token) service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Identity: Send + Sync {
    /// POST the credentials and decode the response body
    ///
    /// An error envelope in the body is not an error at this level; it is
    /// reported by [`AuthResponse::into_grant`].
    async fn request_token(&self, request: &AuthRequest) -> Result<AuthResponse>;
}

/// Trait for Swift storage operations
///
/// Paths are slash separated `container[/object]` strings; an empty path
/// addresses the account root. Every implementation classifies HTTP
/// statuses with [`crate::classify_status`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// HEAD a container or object and classify it
    async fn stat(&self, path: &str) -> Result<StorageItem>;

    /// Names of the immediate children of the root or a container
    async fn list(&self, path: &str) -> Result<Vec<String>>;

    /// Stream an object's content into the file at `dest`
    ///
    /// Returns the number of bytes written.
    async fn get_object(&self, path: &str, dest: &Path) -> Result<u64>;

    /// Stream the file at `source` into an object
    ///
    /// Returns the number of bytes sent.
    async fn put_object(&self, path: &str, source: &Path, content_type: &str) -> Result<u64>;

    /// Create a container with the given headers
    async fn put_container(&self, path: &str, headers: Vec<(String, String)>) -> Result<()>;

    /// Update metadata of a container or object
    async fn post(&self, path: &str, headers: Vec<(String, String)>) -> Result<()>;

    /// Delete an object or an empty container
    async fn delete(&self, path: &str) -> Result<()>;
}
