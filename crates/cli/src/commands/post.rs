//! post command - Update metadata and ACLs
//!
//! Updates the metadata of an existing container or object. A container
//! that does not exist yet is created with the given metadata.

use clap::Args;
use ojs_core::{Error, ItemKind, MetadataUpdate, ObjectStore, PathReference, Result};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Update metadata of a container or object; create missing containers
#[derive(Args, Debug)]
pub struct PostArgs {
    /// Container or object path
    pub path: String,

    /// Metadata item as key:value; an empty value removes the key. May be repeated.
    #[arg(short = 'm', long = "meta", value_parser = MetadataUpdate::parse_pair)]
    pub meta: Vec<(String, String)>,

    /// Read ACL for containers, e.g. ".r:*,.rlistings"
    #[arg(short = 'r', long)]
    pub read_acl: Option<String>,

    /// Write ACL for containers, e.g. "account1,account2"
    #[arg(short = 'w', long)]
    pub write_acl: Option<String>,
}

impl PostArgs {
    fn update(&self) -> MetadataUpdate {
        MetadataUpdate {
            metadata: self.meta.iter().cloned().collect(),
            read_acl: self.read_acl.clone(),
            write_acl: self.write_acl.clone(),
        }
    }
}

/// What the post did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum PostAction {
    Updated,
    Created,
}

#[derive(Debug, Serialize)]
struct PostOutput {
    status: &'static str,
    path: String,
    action: PostAction,
}

/// Execute the post command
pub async fn execute(args: PostArgs, ctx: &Context) -> ExitCode {
    let target = match PathReference::parse(&args.path) {
        Ok(t @ (PathReference::Container(_) | PathReference::Object { .. })) => t,
        Ok(other) => {
            return ctx.fail(&Error::InvalidPath(format!(
                "'{other}' is not a container or object"
            )));
        }
        Err(e) => return ctx.fail(&e),
    };

    let store = match ctx.open_store().await {
        Ok(s) => s,
        Err(e) => return ctx.fail(&e),
    };

    match post(&store, &target, &args.update()).await {
        Ok(action) => {
            let path = target.as_path();
            if ctx.formatter.is_json() {
                ctx.formatter.json(&PostOutput {
                    status: "success",
                    path,
                    action,
                });
            } else {
                match action {
                    PostAction::Updated => ctx.formatter.success(&format!("Updated {path}")),
                    PostAction::Created => ctx.formatter.success(&format!("Created {path}")),
                }
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

/// POST the update if the item exists, otherwise create the container
async fn post<S: ObjectStore + ?Sized>(
    store: &S,
    target: &PathReference,
    update: &MetadataUpdate,
) -> Result<PostAction> {
    let path = target.as_path();

    match store.stat(&path).await {
        Ok(item) => {
            let headers = update.headers(item.kind());
            for (name, value) in &headers {
                tracing::debug!("Set {name}={value}");
            }
            store.post(&path, headers).await?;
            Ok(PostAction::Updated)
        }
        Err(Error::NotFound(_)) if matches!(target, PathReference::Container(_)) => {
            tracing::info!("Container {path} not found, creating it");
            store
                .put_container(&path, update.headers(ItemKind::Container))
                .await?;
            Ok(PostAction::Created)
        }
        Err(e) => Err(e),
    }
}
