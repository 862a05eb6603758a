//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn the origin response into a client response
//! - Strip hop-by-hop headers
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - `x-request-id` is echoed by the propagate layer, not here

use axum::body::Body;
use axum::response::Response;
use hyper::body::Incoming;

use crate::http::request::strip_hop_by_hop;

/// Convert an origin response for the client.
pub fn client_response(response: Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
