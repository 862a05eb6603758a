//! Request path classification.
//!
//! A request is a file request when the final `/`-delimited segment of its
//! path contains a `.`; anything else is a client-side route. The check is
//! purely syntactic: `/v1.2/app` is a route, `/v1.2` is a file.

use std::borrow::Cow;

use serde::Serialize;

/// What a request path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Final segment carries an extension; served as a literal object.
    File,
    /// Extensionless route; served by the site's index document.
    Route,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::File => "file",
            RequestKind::Route => "route",
        }
    }
}

/// Classify `uri` by its final path segment.
pub fn classify(uri: &str) -> RequestKind {
    let last = uri.rsplit_once('/').map_or(uri, |(_, last)| last);
    if last.contains('.') {
        RequestKind::File
    } else {
        RequestKind::Route
    }
}

/// Make `uri` absolute. The empty path becomes `/`.
pub fn ensure_leading_slash(uri: &str) -> Cow<'_, str> {
    if uri.starts_with('/') {
        Cow::Borrowed(uri)
    } else {
        Cow::Owned(format!("/{}", uri))
    }
}
