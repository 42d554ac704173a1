//! ojs-core: Core library for the ojs Swift CLI client
//!
//! This crate provides the authenticated storage session used by every
//! command of the ojs CLI, including:
//! - Session and credential persistence
//! - Token acquisition and expiry caching
//! - Storage URL construction and HTTP status classification
//! - Container/object classification from response headers
//! - Recursive traversal of containers
//!
//! This crate never talks HTTP itself. The transport lives behind the
//! [`Identity`] and [`ObjectStore`] traits so that the session logic can be
//! tested without a server.

pub mod config;
pub mod error;
pub mod identity;
pub mod item;
pub mod path;
pub mod request;
pub mod session;
pub mod token;
pub mod traits;
pub mod walker;

pub use config::{CredentialStore, Settings};
pub use error::{AuthError, Error, Result};
pub use identity::{AuthRequest, AuthResponse, TokenGrant};
pub use item::{ContainerInfo, ItemKind, MetadataUpdate, ObjectInfo, StorageItem};
pub use path::PathReference;
pub use request::{build_storage_url, classify_status, extract_error_message};
pub use session::Session;
pub use token::TokenManager;
pub use traits::{Identity, ObjectStore};
pub use walker::{Visitor, walk};
