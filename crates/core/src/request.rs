//! Request construction and response classification
//!
//! Every storage operation builds its URL with [`build_storage_url`] and
//! runs the response status through [`classify_status`] before looking at
//! the body.

use url::Url;

use crate::error::{Error, Result};
use crate::path::check_segments;

/// Join the storage endpoint and path segments into a request URL
///
/// Exactly one trailing `/` is stripped from the endpoint and every segment
/// is trimmed of leading and trailing slashes before joining with `/`.
/// Characters the URL parser would reinterpret (`?`, `#`, `\`, tabs and
/// line breaks) and `%` itself are escaped so object names reach the server
/// verbatim. `.` and `..` segments are refused with [`Error::InvalidPath`].
pub fn build_storage_url(endpoint: &str, segments: &[&str]) -> Result<Url> {
    let base = endpoint.strip_suffix('/').unwrap_or(endpoint);

    let mut escaped = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = segment.trim_matches('/');
        check_segments(segment)?;
        escaped.push(escape_segment(segment));
    }
    let path = escaped.join("/");

    let raw = format!("{base}/{path}");
    tracing::debug!("{raw}");

    Ok(Url::parse(&raw)?)
}

fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            '\\' => out.push_str("%5C"),
            '\t' => out.push_str("%09"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            c => out.push(c),
        }
    }
    out
}

/// Map an HTTP status to the shared error taxonomy
///
/// `target` names the container or object the request was about and is
/// only used for the error message. `body` is the (usually HTML) error
/// page returned by the server.
pub fn classify_status(target: &str, status: u16, body: &str) -> Result<()> {
    match status {
        404 => Err(Error::NotFound(target.to_string())),
        409 => Err(Error::Conflict(target.to_string())),
        s if s >= 400 => Err(Error::Server {
            status: s,
            message: extract_error_message(body),
        }),
        _ => Ok(()),
    }
}

/// Extract the message from an HTML error page
///
/// Returns the text of the first `<p>…</p>` fragment, or the whole body
/// when there is none.
pub fn extract_error_message(body: &str) -> String {
    if let Some(start) = body.find("<p>") {
        let rest = &body[start + 3..];
        if let Some(end) = rest.find("</p>") {
            return rest[..end].to_string();
        }
    }
    body.trim().to_string()
}
