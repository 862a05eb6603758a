//! Error types for the edge adapters.
//!
//! Routing itself cannot fail; these cover decoding platform events and
//! talking to the storage origin.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The platform event could not be decoded or encoded.
    #[error("invalid edge event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// The rewritten request could not be turned into an origin request.
    #[error("invalid origin request: {0}")]
    OriginRequest(#[from] axum::http::Error),

    /// The configured origin address is not a valid URL authority.
    #[error("invalid origin address: {0}")]
    InvalidOrigin(#[from] url::ParseError),

    /// The origin did not answer.
    #[error("origin request failed: {0}")]
    Origin(#[from] hyper_util::client::legacy::Error),
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOrigin(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OriginRequest(_) | Self::Origin(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::error!(error = %self, status = %status, "edge request failed");
        (status, self.to_string()).into_response()
    }
}
