//! delete command - Delete a container or objects
//!
//! Deleting a container deletes every object in it first, then the emptied
//! container. `container*` deletes the objects but keeps the container.

use async_trait::async_trait;
use clap::Args;
use ojs_core::{Error, ObjectStore, PathReference, Result, Visitor, walk};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete a container or objects within a container
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Container, object or `container*` to delete
    pub path: String,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    status: &'static str,
    deleted: Vec<String>,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, ctx: &Context) -> ExitCode {
    let target = match PathReference::parse(&args.path) {
        Ok(PathReference::Root) => {
            return ctx.fail(&Error::InvalidPath(
                "Refusing to delete every container of the account".into(),
            ));
        }
        Ok(t) => t,
        Err(e) => return ctx.fail(&e),
    };

    let store = match ctx.open_store().await {
        Ok(s) => s,
        Err(e) => return ctx.fail(&e),
    };

    let mut deleter = Deleter::new(&store, &ctx.formatter);
    let result = walk(&store, &target, &mut deleter).await;

    match result {
        Ok(()) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&DeleteOutput {
                    status: "success",
                    deleted: deleter.deleted,
                });
            } else {
                ctx.formatter
                    .success(&format!("Deleted {} item(s).", deleter.deleted.len()));
            }
            ExitCode::Success
        }
        Err(e) => {
            if !deleter.deleted.is_empty() {
                ctx.formatter.warning(&format!(
                    "Deleted {} item(s) before the failure.",
                    deleter.deleted.len()
                ));
            }
            ctx.fail(&e)
        }
    }
}

/// Visitor deleting objects, then each container once it is empty
struct Deleter<'a, S: ?Sized> {
    store: &'a S,
    formatter: &'a Formatter,
    deleted: Vec<String>,
}

impl<'a, S: ObjectStore + ?Sized> Deleter<'a, S> {
    fn new(store: &'a S, formatter: &'a Formatter) -> Self {
        Self {
            store,
            formatter,
            deleted: Vec::new(),
        }
    }

    async fn remove(&mut self, path: &str) -> Result<()> {
        self.store.delete(path).await?;
        tracing::info!("{path} was deleted.");
        if !self.formatter.is_json() {
            self.formatter.println(&format!("Deleted {path}"));
        }
        self.deleted.push(path.to_string());
        Ok(())
    }
}

#[async_trait]
impl<S: ObjectStore + ?Sized> Visitor for Deleter<'_, S> {
    async fn visit_object(&mut self, path: &str) -> Result<()> {
        self.remove(path).await
    }

    async fn leave_container(&mut self, path: &str) -> Result<()> {
        self.remove(path).await
    }
}
