//! Error types for ojs-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for ojs-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while obtaining a token from the identity service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity service answered with an error envelope
    #[error("{title}({code}): {message}")]
    Rejected {
        title: String,
        code: u16,
        message: String,
    },

    /// A required field is absent from the identity response
    #[error("Undefined index: {0}")]
    MissingField(&'static str),

    /// The service catalog has no object-store entry
    #[error("No object-store endpoint in the service catalog")]
    NoObjectStore,

    /// The token expiry is not an RFC 3339 timestamp
    #[error("Invalid token expiry: {0:?}")]
    InvalidExpiry(String),
}

/// Error types for ojs-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid command argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No stored credentials
    #[error(
        "Username, password and tenant name were not found in the credential file. Run `ojs auth` first."
    )]
    NotAuthenticated,

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (HTTP 409), typically deleting a container that still has objects
    #[error("Conflict: {0} (a container must be empty before it can be deleted)")]
    Conflict(String),

    /// Any other HTTP status >= 400
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// A numeric or date header could not be parsed
    #[error("Malformed header {name}: {value:?}")]
    MalformedHeader { name: String, value: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::InvalidArgument(_) => 2, // ParseFlagError
            _ => 1,                                                 // Error
        }
    }
}
