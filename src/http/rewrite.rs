//! URI rewrite middleware.
//!
//! Runs the edge router on every request before it is forwarded. Only the
//! path is rewritten; query string, method, headers and body pass through.
//! The routing decision is attached to the request as a [`Rewrite`] extension.

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::http::request::{request_host, RequestIdExt};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::Rewrite;

pub async fn rewrite_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let rewrite = state
        .inner
        .load()
        .router
        .rewrite(request_host(&req), req.uri().path());

    tracing::debug!(
        request_id = %req.request_id(),
        host = %request_host(&req),
        uri = %req.uri().path(),
        rewritten = %rewrite.uri,
        base_dir = %rewrite.base_dir,
        kind = rewrite.kind.as_str(),
        "URI rewritten"
    );
    metrics::record_rewrite(&rewrite);

    match rewritten_uri(req.uri(), &rewrite) {
        Ok(uri) => *req.uri_mut() = uri,
        Err(e) => {
            // Should not happen for paths that came in on a valid URI.
            tracing::warn!(error = %e, rewritten = %rewrite.uri, "Rewritten URI invalid, passing through");
        }
    }

    req.extensions_mut().insert(rewrite);
    next.run(req).await
}

/// Replace the path of `uri`, keeping scheme, authority and query.
fn rewritten_uri(uri: &Uri, rewrite: &Rewrite) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(q) => format!("{}?{}", rewrite.uri, q),
        None => rewrite.uri.clone(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
