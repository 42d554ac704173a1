//! download command - Download objects
//!
//! Walks the given path and writes every object below `dest`, keeping the
//! object's path relative to what was walked.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use clap::Args;
use ojs_core::{Error, ObjectStore, PathReference, Result, Visitor, walk};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Download objects
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Object, container or `container*` to download
    pub path: String,

    /// Destination directory
    #[arg(default_value = ".")]
    pub dest: PathBuf,
}

#[derive(Debug, Serialize)]
struct DownloadOutput {
    status: &'static str,
    downloaded: Vec<String>,
    total_bytes: u64,
}

/// Execute the download command
pub async fn execute(args: DownloadArgs, ctx: &Context) -> ExitCode {
    let target = match PathReference::parse(&args.path) {
        Ok(t) => t,
        Err(e) => return ctx.fail(&e),
    };

    let store = match ctx.open_store().await {
        Ok(s) => s,
        Err(e) => return ctx.fail(&e),
    };

    let mut downloader = Downloader::new(&store, &target, &args.dest, &ctx.formatter);
    let result = walk(&store, &target, &mut downloader).await;

    match result {
        Ok(()) => {
            if ctx.formatter.is_json() {
                ctx.formatter.json(&DownloadOutput {
                    status: "success",
                    downloaded: downloader.downloaded,
                    total_bytes: downloader.total_bytes,
                });
            } else {
                ctx.formatter.success(&format!(
                    "Downloaded {} object(s), {}.",
                    downloader.downloaded.len(),
                    humansize::format_size(downloader.total_bytes, humansize::BINARY)
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            if !downloader.downloaded.is_empty() {
                ctx.formatter.warning(&format!(
                    "Downloaded {} object(s) before the failure.",
                    downloader.downloaded.len()
                ));
            }
            ctx.fail(&e)
        }
    }
}

/// Visitor writing each object below a destination directory
struct Downloader<'a, S: ?Sized> {
    store: &'a S,
    target: &'a PathReference,
    dest: &'a Path,
    formatter: &'a Formatter,
    downloaded: Vec<String>,
    total_bytes: u64,
}

impl<'a, S: ObjectStore + ?Sized> Downloader<'a, S> {
    fn new(
        store: &'a S,
        target: &'a PathReference,
        dest: &'a Path,
        formatter: &'a Formatter,
    ) -> Self {
        Self {
            store,
            target,
            dest,
            formatter,
            downloaded: Vec::new(),
            total_bytes: 0,
        }
    }
}

#[async_trait]
impl<S: ObjectStore + ?Sized> Visitor for Downloader<'_, S> {
    async fn visit_object(&mut self, path: &str) -> Result<()> {
        let local = local_target(self.dest, &relative_name(self.target, path))?;
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = self.store.get_object(path, &local).await?;

        if !self.formatter.is_json() {
            self.formatter.println(&format!(
                "{path} -> {} ({})",
                local.display(),
                humansize::format_size(size, humansize::BINARY)
            ));
        }

        self.downloaded.push(path.to_string());
        self.total_bytes += size;
        Ok(())
    }
}

/// Name of an object relative to what was walked
///
/// Objects below a container keep their path inside the container, objects
/// reached from the root keep the container as first component, and a
/// directly named object is saved under its base name.
fn relative_name(target: &PathReference, path: &str) -> String {
    match target {
        PathReference::Root => path.to_string(),
        PathReference::Container(base) | PathReference::Children(base) => path
            .strip_prefix(base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
            .to_string(),
        PathReference::Object { .. } => path.rsplit('/').next().unwrap_or(path).to_string(),
    }
}

/// Local file for a relative object name, refusing to leave `dest`
fn local_target(dest: &Path, relative: &str) -> Result<PathBuf> {
    let mut local = dest.to_path_buf();
    let mut pushed = false;

    for part in relative.split('/').filter(|p| !p.is_empty()) {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => {
                local.push(name);
                pushed = true;
            }
            (Some(Component::CurDir), None) => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "Refusing to write object '{relative}' outside the destination"
                )));
            }
        }
    }

    if !pushed {
        return Err(Error::InvalidPath(format!(
            "Object '{relative}' has no file name"
        )));
    }
    Ok(local)
}
