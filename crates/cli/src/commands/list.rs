//! list command - List containers and objects
//!
//! Lists the containers of the account, or the objects of a container.
//! `container*` lists the children of `container` as well.

use clap::Args;
use ojs_core::{ObjectStore, PathReference, Result};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// List containers, or objects within a container
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Container or object to list; defaults to the account root
    #[arg(default_value = "/")]
    pub path: String,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    path: String,
    items: Vec<String>,
}

/// Execute the list command
pub async fn execute(args: ListArgs, ctx: &Context) -> ExitCode {
    let target = match PathReference::parse(&args.path) {
        Ok(t) => t,
        Err(e) => return ctx.fail(&e),
    };

    let store = match ctx.open_store().await {
        Ok(s) => s,
        Err(e) => return ctx.fail(&e),
    };

    match list(&store, &target).await {
        Ok(items) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&ListOutput {
                    path: target.to_string(),
                    items,
                });
            } else {
                for item in &items {
                    ctx.formatter.println(item);
                }
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

/// Immediate children of `target`, in listing order
async fn list<S: ObjectStore + ?Sized>(store: &S, target: &PathReference) -> Result<Vec<String>> {
    store.list(&target.as_path()).await
}
