//! Edge URI router for multi-tenant static-site hosting.
//!
//! Maps `(host, uri)` to an object path in storage: subdomains get their own
//! prefix, the bare and `www` domains share `/production`, and extensionless
//! routes fall back to the site's `index.html`.
//!
//! ```
//! use edge_router::rewrite_uri;
//!
//! assert_eq!(rewrite_uri("acme.example.com", "/app.js"), "/acme/app.js");
//! assert_eq!(rewrite_uri("www.example.com", "/pricing"), "/production/index.html");
//! ```

pub mod admin;
pub mod config;
pub mod edge;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::EdgeConfig;
pub use error::EdgeError;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
pub use routing::{rewrite_uri, EdgeRouter, Rewrite};
