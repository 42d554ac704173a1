//! stat command - Show container or object information
//!
//! Displays the fields and metadata read from a HEAD request.

use clap::Args;
use ojs_core::{ContainerInfo, Error, ObjectInfo, ObjectStore as _, PathReference, StorageItem};

use super::Context;
use crate::exit_code::ExitCode;

/// Show information about a container or object
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Container or object path (container[/object])
    pub path: String,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, ctx: &Context) -> ExitCode {
    let target = match PathReference::parse(&args.path) {
        Ok(PathReference::Container(c)) => PathReference::Container(c),
        Ok(object @ PathReference::Object { .. }) => object,
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

    match store.stat(&target.as_path()).await {
        Ok(item) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&item);
            } else {
                ctx.formatter.println(&render(&item));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail(&e),
    }
}

/// Human readable report with right-aligned labels
fn render(item: &StorageItem) -> String {
    match item {
        StorageItem::Container(c) => render_container(c),
        StorageItem::Object(o) => render_object(o),
    }
}

fn render_container(info: &ContainerInfo) -> String {
    let width = label_width(10, info.metadata.keys());
    let mut lines = vec![
        line(width, "Container", &info.name),
        line(width, "Objects", &info.object_count.to_string()),
        line(
            width,
            "Bytes",
            &format!(
                "{} ({})",
                info.bytes_used,
                humansize::format_size(info.bytes_used, humansize::BINARY)
            ),
        ),
        line(width, "Read ACL", &info.read_acl),
        line(width, "Write ACL", &info.write_acl),
    ];
    lines.extend(info.metadata.iter().map(|(k, v)| line(width, k, v)));
    lines.join("\n")
}

fn render_object(info: &ObjectInfo) -> String {
    let width = label_width(14, info.metadata.keys());
    let last_modified = info
        .last_modified
        .map(|ts| ts.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_default();

    let mut lines = vec![
        line(width, "Object", &info.name),
        line(width, "Content Type", &info.content_type),
        line(width, "Content Length", &info.content_length.to_string()),
        line(width, "Last Modified", &last_modified),
        line(width, "ETag", &info.etag),
    ];
    lines.extend(info.metadata.iter().map(|(k, v)| line(width, k, v)));
    lines.join("\n")
}

fn label_width<'a>(minimum: usize, names: impl Iterator<Item = &'a String>) -> usize {
    names.map(String::len).fold(minimum, usize::max)
}

fn line(width: usize, label: &str, value: &str) -> String {
    format!("{label:>width$}: {value}")
}
