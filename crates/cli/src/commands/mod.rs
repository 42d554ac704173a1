//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! Every command except `auth`, `deauth` and `version` opens an
//! authenticated session through [`Context::open_store`] first.

use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use ojs_core::config::DEFAULT_IDENTITY_URL;
use ojs_core::{CredentialStore, Error, Result, Settings, TokenManager};
use ojs_swift::{KeystoneClient, SwiftClient};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod auth;
mod deauth;
mod delete;
mod download;
mod list;
mod post;
mod stat;
mod upload;
mod version;

#[cfg(test)]
mod test_support;

/// ojs - OpenStack Swift CLI Client
///
/// A command-line interface for Swift compatible object storage services
/// authenticated through Keystone v2.
#[derive(Parser, Debug)]
#[command(name = "ojs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Keystone v2 identity endpoint
    #[arg(long, global = true, env = "OJS_IDENTITY_URL", default_value = DEFAULT_IDENTITY_URL)]
    pub identity_url: String,

    /// Connect timeout in seconds
    #[arg(long, global = true, env = "OJS_CONNECT_TIMEOUT", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Total timeout in seconds for requests that do not transfer object content
    #[arg(long, global = true, env = "OJS_REQUEST_TIMEOUT", default_value_t = 300)]
    pub request_timeout: u64,

    /// Longest stall in seconds while uploading or downloading object content
    #[arg(long, global = true, env = "OJS_READ_TIMEOUT", default_value_t = 60)]
    pub read_timeout: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate a user and store the token
    Auth(auth::AuthArgs),

    /// Remove the stored credentials
    Deauth,

    /// List containers, or objects within a container
    List(list::ListArgs),

    /// Show information about a container or object
    Stat(stat::StatArgs),

    /// Upload files or directories to a container
    Upload(upload::UploadArgs),

    /// Download objects
    Download(download::DownloadArgs),

    /// Delete a container or objects within a container
    Delete(delete::DeleteArgs),

    /// Update metadata of a container or object; create missing containers
    Post(post::PostArgs),

    /// Print the version
    Version,
}

/// Shared state handed to every command
pub struct Context {
    pub settings: Settings,
    pub credentials: CredentialStore,
    pub formatter: Formatter,
}

impl Context {
    /// Ensure a valid token and return a client for the storage endpoint
    ///
    /// The credential file is rewritten only when the token was refreshed.
    pub async fn open_store(&self) -> Result<SwiftClient> {
        let session = self.credentials.load();
        let manager = TokenManager::new(KeystoneClient::new(&self.settings)?);
        let refreshed = manager.ensure_valid(session.clone()).await?;

        if refreshed != session {
            self.credentials.save(&refreshed)?;
        }

        SwiftClient::new(&refreshed, &self.settings)
    }

    /// Report an error and map it to an exit code
    pub fn fail(&self, err: &Error) -> ExitCode {
        self.formatter.error(&err.to_string());
        ExitCode::from(err)
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    });

    let Some(command) = cli.command else {
        let mut usage = Cli::command();
        eprintln!("{}", usage.render_help());
        return ExitCode::Usage;
    };

    let credentials = match CredentialStore::new() {
        Ok(store) => store,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::Error;
        }
    };

    let ctx = Context {
        settings: Settings {
            identity_url: cli.identity_url,
            connect_timeout: Duration::from_secs(cli.connect_timeout),
            request_timeout: Duration::from_secs(cli.request_timeout),
            read_timeout: Duration::from_secs(cli.read_timeout),
        },
        credentials,
        formatter,
    };

    match command {
        Commands::Auth(args) => auth::execute(args, &ctx).await,
        Commands::Deauth => deauth::execute(&ctx),
        Commands::List(args) => list::execute(args, &ctx).await,
        Commands::Stat(args) => stat::execute(args, &ctx).await,
        Commands::Upload(args) => upload::execute(args, &ctx).await,
        Commands::Download(args) => download::execute(args, &ctx).await,
        Commands::Delete(args) => delete::execute(args, &ctx).await,
        Commands::Post(args) => post::execute(args, &ctx).await,
        Commands::Version => version::execute(&ctx),
    }
}
