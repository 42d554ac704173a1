//! Configuration management
//!
//! This module handles the runtime [`Settings`] and the credential file that
//! persists the [`Session`] between invocations. The credential file is
//! stored in TOML format at ~/.config/ojs/credentials.toml.
//!
//! PROTECTED FILE: Changes to schema_version require migration support.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::Session;

/// Current credential file schema version
///
/// IMPORTANT: Bumping this version requires:
/// 1. Adding a migration in `CredentialStore::migrate`
/// 2. Updating migration tests
/// 3. Marking the change as BREAKING
pub const SCHEMA_VERSION: u32 = 1;

/// Identity endpoint used when none is configured
pub const DEFAULT_IDENTITY_URL: &str = "https://ident-r1nd1001.cnode.jp/v2.0";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "OJS_CONFIG_DIR";

const CREDENTIAL_FILE: &str = "credentials.toml";

/// Runtime settings shared by the HTTP clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the Keystone v2 identity service
    pub identity_url: String,

    /// TCP connect timeout for every request
    pub connect_timeout: Duration,

    /// Total timeout for requests that do not transfer object content
    pub request_timeout: Duration,

    /// Longest pause between reads while object content is transferred
    pub read_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            read_timeout: Duration::from_secs(60),
        }
    }
}

/// On-disk layout of the credential file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    /// Schema version for migration support
    schema_version: u32,

    #[serde(default)]
    session: Session,
}

/// Credential store handles loading and saving the session
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a CredentialStore at the default location
    ///
    /// `OJS_CONFIG_DIR` takes precedence over the platform config directory.
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("ojs"),
        };
        Ok(Self {
            path: config_dir.join(CREDENTIAL_FILE),
        })
    }

    /// Create a CredentialStore with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the credential file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the stored session
    ///
    /// This never fails: a missing, unreadable or corrupt file yields an
    /// empty session, which is overwritten on the next save.
    pub fn load(&self) -> Session {
        match self.try_load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Cannot read the credential file: {e}");
                Session::default()
            }
        }
    }

    fn try_load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut file: CredentialFile = toml::from_str(&content)?;

        if file.schema_version < SCHEMA_VERSION {
            file = self.migrate(file)?;
        } else if file.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Credential file version {} is newer than supported version {}. Please upgrade ojs.",
                file.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(file.session)
    }

    /// Save the session to disk
    ///
    /// Creates parent directories if they don't exist.
    /// The file is created with permissions 600 (owner read/write only) and
    /// an existing file is restricted to 600 before it is rewritten.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = CredentialFile {
            schema_version: SCHEMA_VERSION,
            session: session.clone(),
        };
        let content = toml::to_string_pretty(&file)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut handle = options.open(&self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            handle.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        handle.write_all(content.as_bytes())?;

        tracing::debug!(path = %self.path.display(), "Saved credentials");
        Ok(())
    }

    /// Remove the credential file
    ///
    /// Returns whether a file was actually removed.
    pub fn remove(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Migrate the credential file from an older schema version
    fn migrate(&self, file: CredentialFile) -> Result<CredentialFile> {
        let mut file = file;
        file.schema_version = SCHEMA_VERSION;
        Ok(file)
    }
}
