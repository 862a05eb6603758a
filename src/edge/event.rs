//! Viewer-request event envelope.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "request": {
//!     "method": "GET",
//!     "uri": "/about",
//!     "headers": { "host": { "value": "acme.example.com" } }
//!   }
//! }
//! ```
//!
//! Every field other than `request.uri` is opaque and round-trips untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::EdgeError;
use crate::routing::{EdgeRouter, Rewrite};

/// The full event delivered by the edge platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeEvent {
    pub request: EdgeRequest,

    /// Context, viewer and anything else the platform sends.
    #[serde(flatten)]
    pub envelope: Map<String, Value>,
}

/// The request part of an edge event.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EdgeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Map<String, Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl EdgeRequest {
    /// Value of the `host` header, or `""` when absent.
    pub fn host(&self) -> &str {
        self.headers
            .get("host")
            .and_then(|h| h.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Route this request, returning a new request and the routing decision.
    pub fn route(&self, router: &EdgeRouter) -> (EdgeRequest, Rewrite) {
        let rewrite = router.rewrite(self.host(), &self.uri);
        let request = EdgeRequest {
            uri: rewrite.uri.clone(),
            ..self.clone()
        };
        (request, rewrite)
    }
}

/// Decode an event, route its request, and encode the returned request.
pub fn handle_event(router: &EdgeRouter, event: &str) -> Result<String, EdgeError> {
    let event: EdgeEvent = serde_json::from_str(event)?;
    let (request, rewrite) = event.request.route(router);

    tracing::debug!(
        host = %event.request.host(),
        uri = %event.request.uri,
        rewritten = %rewrite.uri,
        kind = rewrite.kind.as_str(),
        "Edge event routed"
    );

    Ok(serde_json::to_string(&request)?)
}
