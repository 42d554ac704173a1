//! auth command - Authenticate a user
//!
//! Requests a new token and stores it together with the credentials.

use clap::Args;
use ojs_core::{Result, Session, TokenManager};
use ojs_swift::KeystoneClient;
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Authenticate a user
#[derive(Args, Debug)]
pub struct AuthArgs {
    /// API username
    #[arg(short = 'u', long = "api-username")]
    pub username: String,

    /// API password
    #[arg(short = 'p', long = "api-password")]
    pub password: String,

    /// Tenant name (defaults to the username)
    #[arg(short = 't', long = "tenant-name")]
    pub tenant_name: Option<String>,
}

impl AuthArgs {
    /// Tenant to authenticate against
    pub fn tenant(&self) -> &str {
        self.tenant_name
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Serialize)]
struct AuthOutput {
    status: &'static str,
    username: String,
    tenant_name: String,
    tenant_id: String,
    expires: String,
    endpoint: String,
}

impl From<&Session> for AuthOutput {
    fn from(session: &Session) -> Self {
        Self {
            status: "success",
            username: session.username.clone(),
            tenant_name: session.tenant_name.clone(),
            tenant_id: session.tenant_id.clone(),
            expires: session.token_expires.clone(),
            endpoint: session.endpoint_url.clone(),
        }
    }
}

/// Execute the auth command
pub async fn execute(args: AuthArgs, ctx: &Context) -> ExitCode {
    match authenticate(&args, ctx).await {
        Ok(session) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&AuthOutput::from(&session));
            } else {
                ctx.formatter.success(&format!(
                    "Authenticated as {} (tenant {}). Token expires at {}.",
                    session.username, session.tenant_name, session.token_expires
                ));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

async fn authenticate(args: &AuthArgs, ctx: &Context) -> Result<Session> {
    let manager = TokenManager::new(KeystoneClient::new(&ctx.settings)?);
    let session = manager
        .authenticate(&args.username, &args.password, args.tenant())
        .await?;
    ctx.credentials.save(&session)?;
    Ok(session)
}
