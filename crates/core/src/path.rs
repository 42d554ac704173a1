//! Path parsing
//!
//! Handles parsing of storage paths in the format: container[/object]
//! A bare `/` (or empty string) names the account root, and a trailing `*`
//! selects every child of a container.

use crate::error::{Error, Result};

/// A parsed reference to something in the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathReference {
    /// The account root, whose children are containers
    Root,
    /// A container
    Container(String),
    /// An object inside a container
    Object { container: String, object: String },
    /// Every child of the given container (`container*`)
    Children(String),
}

impl PathReference {
    /// Parse a user supplied path
    ///
    /// Only a trailing `*` is treated as a wildcard; `*` anywhere else is
    /// part of the name.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Some(base) = input.strip_suffix('*') {
            let base = base.trim_matches('/');
            if base.is_empty() {
                return Ok(PathReference::Root);
            }
            if base.ends_with('*') {
                return Err(Error::InvalidPath(format!(
                    "'{input}' has more than one trailing wildcard"
                )));
            }
            check_segments(base)?;
            return Ok(PathReference::Children(base.to_string()));
        }

        let trimmed = input.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(PathReference::Root);
        }
        check_segments(trimmed)?;

        match trimmed.split_once('/') {
            Some((container, object)) if !object.is_empty() => Ok(PathReference::Object {
                container: container.to_string(),
                object: object.to_string(),
            }),
            _ => Ok(PathReference::Container(trimmed.to_string())),
        }
    }

    /// The slash separated storage path, empty for the root
    pub fn as_path(&self) -> String {
        match self {
            PathReference::Root => String::new(),
            PathReference::Container(name) | PathReference::Children(name) => name.clone(),
            PathReference::Object { container, object } => format!("{container}/{object}"),
        }
    }
}

impl std::fmt::Display for PathReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathReference::Root => write!(f, "/"),
            PathReference::Children(base) => write!(f, "{base}*"),
            other => write!(f, "{}", other.as_path()),
        }
    }
}

/// Refuse `.` and `..` path segments
///
/// URL normalization would resolve them and send the request to a
/// different container or object than the one named.
pub fn check_segments(path: &str) -> Result<()> {
    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(Error::InvalidPath(format!(
            "'{path}' contains a '.' or '..' segment"
        )));
    }
    Ok(())
}

/// Join a listing entry onto its parent path
pub fn join_path(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}
