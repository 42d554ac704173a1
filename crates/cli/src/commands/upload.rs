//! upload command - Upload files or directories to a container
//!
//! A file is stored under its file name. A directory is walked recursively
//! and each file is stored under `<directory name>/<relative path>`.

use std::path::{Path, PathBuf};

use clap::Args;
use ojs_core::path::join_path;
use ojs_core::{Error, ObjectStore, PathReference, Result};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Upload files or directories to a container
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Destination container
    pub container: String,

    /// Files or directories to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Content type for every uploaded file; guessed from the extension if unset
    #[arg(short = 'c', long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    status: &'static str,
    uploaded: Vec<String>,
    total_bytes: u64,
}

/// A local file and the object name it is stored under
#[derive(Debug, PartialEq, Eq)]
struct Upload {
    source: PathBuf,
    name: String,
}

/// Execute the upload command
pub async fn execute(args: UploadArgs, ctx: &Context) -> ExitCode {
    let container = match PathReference::parse(&args.container) {
        Ok(PathReference::Root) | Ok(PathReference::Children(_)) => {
            return ctx.fail(&Error::InvalidPath(format!(
                "'{}' is not a container",
                args.container
            )));
        }
        Ok(target) => target.as_path(),
        Err(e) => return ctx.fail(&e),
    };

    for file in &args.files {
        if !file.exists() {
            return ctx.fail(&Error::InvalidArgument(format!(
                "File \"{}\" not found.",
                file.display()
            )));
        }
    }

    let mut uploads = Vec::new();
    for file in &args.files {
        match collect_uploads(file) {
            Ok(found) => uploads.extend(found),
            Err(e) => return ctx.fail(&e),
        }
    }

    let store = match ctx.open_store().await {
        Ok(s) => s,
        Err(e) => return ctx.fail(&e),
    };

    let mut uploaded = Vec::new();
    let mut total_bytes = 0u64;

    for upload in &uploads {
        let target = join_path(&container, &upload.name);
        match upload_file(&store, upload, &target, args.content_type.as_deref()).await {
            Ok(size) => {
                total_bytes += size;
                if !ctx.formatter.is_json() {
                    ctx.formatter.println(&format!(
                        "{} -> {target} ({})",
                        upload.source.display(),
                        humansize::format_size(size, humansize::BINARY)
                    ));
                }
                uploaded.push(target);
            }
            Err(e) => {
                if !uploaded.is_empty() {
                    ctx.formatter.warning(&format!(
                        "Uploaded {} of {} file(s) before the failure.",
                        uploaded.len(),
                        uploads.len()
                    ));
                }
                return ctx.fail(&e);
            }
        }
    }

    if ctx.formatter.is_json() {
        ctx.formatter.json(&UploadOutput {
            status: "success",
            uploaded,
            total_bytes,
        });
    } else {
        ctx.formatter.success(&format!(
            "Uploaded {} file(s), {}.",
            uploaded.len(),
            humansize::format_size(total_bytes, humansize::BINARY)
        ));
    }
    ExitCode::Success
}

async fn upload_file<S: ObjectStore + ?Sized>(
    store: &S,
    upload: &Upload,
    target: &str,
    content_type: Option<&str>,
) -> Result<u64> {
    let content_type = detect_content_type(content_type, &upload.source);
    let size = store
        .put_object(target, &upload.source, &content_type)
        .await?;
    tracing::info!("{} (content-type: {content_type}) was uploaded.", upload.source.display());
    Ok(size)
}

/// Content type from the flag, else the extension, else octet-stream
fn detect_content_type(explicit: Option<&str>, path: &Path) -> String {
    if let Some(ct) = explicit.filter(|ct| !ct.is_empty()) {
        return ct.to_string();
    }

    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Expand a file or directory argument into individual uploads
fn collect_uploads(path: &Path) -> Result<Vec<Upload>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::InvalidArgument(format!("Cannot upload \"{}\".", path.display())))?;

    if path.is_dir() {
        let mut uploads = Vec::new();
        walk_dir(path, &name, &mut uploads)?;
        Ok(uploads)
    } else {
        Ok(vec![Upload {
            source: path.to_path_buf(),
            name,
        }])
    }
}

fn walk_dir(dir: &Path, prefix: &str, uploads: &mut Vec<Upload>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = format!("{prefix}/{}", entry.file_name().to_string_lossy());
        if path.is_dir() {
            walk_dir(&path, &name, uploads)?;
        } else if path.is_file() {
            uploads.push(Upload { source: path, name });
        }
    }
    Ok(())
}
