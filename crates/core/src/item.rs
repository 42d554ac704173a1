//! Container and object records
//!
//! Swift has no explicit type field: a HEAD response describes a container
//! iff it carries both `X-Container-Object-Count` and
//! `X-Container-Bytes-Used`. Everything else is treated as an object.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;

use crate::error::{Error, Result};

const OBJECT_COUNT: &str = "x-container-object-count";
const BYTES_USED: &str = "x-container-bytes-used";
const READ_ACL: &str = "x-container-read";
const WRITE_ACL: &str = "x-container-write";
const CONTENT_TYPE: &str = "content-type";
const CONTENT_LENGTH: &str = "content-length";
const ETAG: &str = "etag";
const LAST_MODIFIED: &str = "last-modified";

/// Container details from a HEAD response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub name: String,
    pub object_count: u64,
    pub bytes_used: u64,
    pub read_acl: String,
    pub write_acl: String,
    pub metadata: BTreeMap<String, String>,
}

/// Object details from a HEAD response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub name: String,
    pub content_type: String,
    pub content_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    pub etag: String,
    pub metadata: BTreeMap<String, String>,
}

/// Either kind of item returned by stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageItem {
    Container(ContainerInfo),
    Object(ObjectInfo),
}

/// Discriminant of [`StorageItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Container,
    Object,
}

impl StorageItem {
    /// Build a record from the headers of a HEAD response
    ///
    /// Header names are matched case-insensitively. Headers without a
    /// dedicated field end up in `metadata` under the name as received.
    pub fn from_headers(name: &str, headers: &[(String, String)]) -> Result<Self> {
        let has = |wanted: &str| headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(wanted));

        if has(OBJECT_COUNT) && has(BYTES_USED) {
            let mut info = ContainerInfo {
                name: name.to_string(),
                ..Default::default()
            };
            for (header, value) in headers {
                match header.to_ascii_lowercase().as_str() {
                    OBJECT_COUNT => info.object_count = parse_u64(header, value)?,
                    BYTES_USED => info.bytes_used = parse_u64(header, value)?,
                    READ_ACL => info.read_acl = value.clone(),
                    WRITE_ACL => info.write_acl = value.clone(),
                    _ => {
                        info.metadata.insert(header.clone(), value.clone());
                    }
                }
            }
            Ok(StorageItem::Container(info))
        } else {
            let mut info = ObjectInfo {
                name: name.to_string(),
                ..Default::default()
            };
            for (header, value) in headers {
                match header.to_ascii_lowercase().as_str() {
                    CONTENT_TYPE => info.content_type = value.clone(),
                    CONTENT_LENGTH => info.content_length = parse_u64(header, value)?,
                    ETAG => info.etag = value.clone(),
                    LAST_MODIFIED => info.last_modified = Some(parse_http_date(header, value)?),
                    _ => {
                        info.metadata.insert(header.clone(), value.clone());
                    }
                }
            }
            Ok(StorageItem::Object(info))
        }
    }

    /// Name the item was resolved from
    pub fn name(&self) -> &str {
        match self {
            StorageItem::Container(c) => &c.name,
            StorageItem::Object(o) => &o.name,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            StorageItem::Container(_) => ItemKind::Container,
            StorageItem::Object(_) => ItemKind::Object,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind() == ItemKind::Container
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| Error::MalformedHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_http_date(name: &str, value: &str) -> Result<Timestamp> {
    jiff::fmt::rfc2822::DateTimeParser::new()
        .parse_timestamp(value.trim())
        .map_err(|_| Error::MalformedHeader {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Metadata and ACL changes sent with a POST (or PUT for new containers)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    /// Metadata to set; an empty value removes the key
    pub metadata: BTreeMap<String, String>,
    /// New read ACL, containers only
    pub read_acl: Option<String>,
    /// New write ACL, containers only
    pub write_acl: Option<String>,
}

impl MetadataUpdate {
    /// Request headers for this update against an item of `kind`
    pub fn headers(&self, kind: ItemKind) -> Vec<(String, String)> {
        let scope = match kind {
            ItemKind::Container => "Container",
            ItemKind::Object => "Object",
        };

        let mut headers: Vec<(String, String)> = self
            .metadata
            .iter()
            .map(|(key, value)| {
                let header = if value.is_empty() {
                    format!("X-Remove-{scope}-Meta-{key}")
                } else {
                    format!("X-{scope}-Meta-{key}")
                };
                (header, value.clone())
            })
            .collect();

        if kind == ItemKind::Container {
            if let Some(acl) = &self.read_acl {
                headers.push(("X-Container-Read".to_string(), acl.clone()));
            }
            if let Some(acl) = &self.write_acl {
                headers.push(("X-Container-Write".to_string(), acl.clone()));
            }
        }

        headers
    }

    /// Parse a `key:value` metadata argument
    pub fn parse_pair(arg: &str) -> Result<(String, String)> {
        match arg.split(':').collect::<Vec<_>>().as_slice() {
            [key, value] if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(Error::InvalidArgument(format!(
                "\"{arg}\" is invalid metadata."
            ))),
        }
    }
}
