//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract routing-relevant information (host)
//! - Prepare the rewritten request for forwarding to the origin
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host header wins; HTTP/2 requests fall back to the URI authority
//! - Hop-by-hop headers are not forwarded

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

use crate::error::EdgeError;
use crate::routing::host::strip_port;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers that describe a single hop and are never forwarded.
pub static HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Generates `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Convenience accessors on incoming requests.
pub trait RequestIdExt {
    /// The request ID, or `"unknown"` if none was assigned.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Host the request was addressed to, without port.
///
/// Empty if unknown, or if the value carries URI delimiters (`/`, `?`, `#`)
/// that would leak into the rewritten path.
pub fn request_host<B>(req: &Request<B>) -> &str {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default();

    if host.contains(['/', '?', '#']) {
        return "";
    }
    strip_port(host)
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in HOP_BY_HOP.iter().chain(named.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Build the request sent to the origin from an already rewritten request.
pub fn origin_request(
    request: Request<Body>,
    origin: &Url,
    preserve_host: bool,
) -> Result<Request<Body>, EdgeError> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("{}{}", origin.as_str().trim_end_matches('/'), path_and_query);

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    if !preserve_host {
        headers.remove(header::HOST);
    }

    let mut builder = Request::builder().method(parts.method).uri(target);
    if let Some(h) = builder.headers_mut() {
        *h = headers;
    }

    Ok(builder.body(body)?)
}
